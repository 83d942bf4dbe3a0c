//! Environment configuration

/// Name of the variable holding the target bucket
pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";
/// Name of the variable holding the optional region override
pub const REGION_VAR: &str = "AWS_REGION";

/// Configuration read from the execution environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchConfig {
    /// Bucket objects are served from. Passed to the store as is, unset included.
    pub bucket: Option<String>,
    /// Region override for the S3 client; the SDK's default chain applies when unset
    pub region: Option<String>,
}

impl FetchConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        FetchConfig {
            bucket: read(BUCKET_NAME_VAR),
            region: read(REGION_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn reads_bucket_and_region() {
        let env = hashmap! {
            "BUCKET_NAME" => "assets",
            "AWS_REGION" => "eu-west-1",
        };
        let config = FetchConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.bucket.as_deref(), Some("assets"));
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn empty_values_are_unset() {
        let env = hashmap! { "BUCKET_NAME" => "", "AWS_REGION" => "" };
        let config = FetchConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config, FetchConfig::default());
    }
}
