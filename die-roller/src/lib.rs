//! Dice roll expressions served through API Gateway.
//!
//! A roll string is either a single term or two sub-expressions joined by an
//! operator:
//!
//! * `NdS` rolls `N` dice with `S` sides (`N` defaults to 1), e.g. `3d6`, `d20`
//! * `K` is the constant `K`
//! * `A+B`, `A-B`, `A*B`, `A/B` combine two expressions, `/` rounding down
//!
//! The expression is split at its first `+` or `-`, or failing that at its
//! first `*` or `/`, and both halves are evaluated recursively. That makes
//! `+`/`-` bind looser than `*`/`/`, and every operator group to the right:
//! `10-4-3` is `10-(4-3)`.

use proxy_http::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    Body, IntoResponse, ProxyRequest, ProxyResponse, Response,
};
use rand::Rng;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

/// Path parameter holding the roll string
pub const ROLL_STRING_PARAM: &str = "rollString";
/// Rolled when the request names no roll string
pub const DEFAULT_ROLL: &str = "1d20";
/// Most dice a single term may roll
pub const MAX_DICE: u64 = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum RollError {
    #[error("Invalid roll string: {0}")]
    Invalid(String),
    #[error("Dice need at least one side: {0}")]
    NoSides(String),
    #[error("Too many dice in {0}, at most {max} are allowed", max = MAX_DICE)]
    TooManyDice(String),
    #[error("Division by zero in {0}")]
    DivisionByZero(String),
    #[error("Roll total out of range in {0}")]
    Overflow(String),
}

/// Outcome of evaluating a roll string
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollResult {
    pub total: i64,
    pub rolls: Rolls,
}

/// Individual die results keyed by the term that produced them.
///
/// Terms keep the order they appear in. A term that appears more than once
/// keeps one list of results per appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rolls(Vec<(String, Vec<Vec<u32>>)>);

impl Rolls {
    fn single(term: &str, dice: Vec<u32>) -> Self {
        Rolls(vec![(term.to_string(), vec![dice])])
    }

    fn merge(mut self, other: Rolls) -> Self {
        for (term, rolls) in other.0 {
            match self.0.iter_mut().find(|(existing, _)| *existing == term) {
                Some((_, existing)) => existing.extend(rolls),
                None => self.0.push((term, rolls)),
            }
        }
        self
    }

    /// Results recorded for `term`, one list per appearance
    pub fn get(&self, term: &str) -> Option<&[Vec<u32>]> {
        self.0
            .iter()
            .find(|(existing, _)| existing == term)
            .map(|(_, rolls)| rolls.as_slice())
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(term, _)| term.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// serialized by hand so the rolls keep their order
impl Serialize for Rolls {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (term, rolls) in &self.0 {
            map.serialize_entry(term, rolls)?;
        }
        map.end()
    }
}

/// Evaluate `roll`, drawing dice from `rng`.
pub fn evaluate<R>(roll: &str, rng: &mut R) -> Result<RollResult, RollError>
where
    R: Rng,
{
    if let Some((count, sides)) = split_dice(roll) {
        let count = if count.is_empty() {
            1
        } else {
            count
                .parse::<u64>()
                .ok()
                .filter(|count| *count <= MAX_DICE)
                .ok_or_else(|| RollError::TooManyDice(roll.to_string()))?
        };
        let sides = sides
            .parse::<u32>()
            .map_err(|_| RollError::Invalid(roll.to_string()))?;
        if sides == 0 {
            return Err(RollError::NoSides(roll.to_string()));
        }

        let dice: Vec<u32> = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
        let total = dice.iter().map(|die| i64::from(*die)).sum();
        return Ok(RollResult {
            total,
            rolls: Rolls::single(roll, dice),
        });
    }

    if is_number(roll) {
        let total = roll
            .parse::<i64>()
            .map_err(|_| RollError::Overflow(roll.to_string()))?;
        return Ok(RollResult {
            total,
            rolls: Rolls::default(),
        });
    }

    let split = roll
        .find(&['+', '-'][..])
        .or_else(|| roll.find(&['*', '/'][..]))
        .ok_or_else(|| RollError::Invalid(roll.to_string()))?;
    let operator = roll.as_bytes()[split];
    let left = evaluate(&roll[..split], &mut *rng)?;
    let right = evaluate(&roll[split + 1..], &mut *rng)?;

    let total = match operator {
        b'+' => left.total.checked_add(right.total),
        b'-' => left.total.checked_sub(right.total),
        b'*' => left.total.checked_mul(right.total),
        _ => {
            if right.total == 0 {
                return Err(RollError::DivisionByZero(roll.to_string()));
            }
            floor_div(left.total, right.total)
        }
    }
    .ok_or_else(|| RollError::Overflow(roll.to_string()))?;

    Ok(RollResult {
        total,
        rolls: left.rolls.merge(right.rolls),
    })
}

/// Answer a die roller request. Bad roll strings get a 400 naming the problem.
pub fn handle<R>(request: &ProxyRequest, rng: &mut R) -> Result<ProxyResponse, serde_json::Error>
where
    R: Rng,
{
    let roll = request.path_parameter(ROLL_STRING_PARAM).unwrap_or(DEFAULT_ROLL);
    let (status, body) = match evaluate(roll, rng) {
        Ok(result) => {
            debug!(roll, total = result.total, "rolled");
            (StatusCode::OK, serde_json::to_string(&result)?)
        }
        Err(err) => {
            info!(roll, error = %err, "rejected roll string");
            (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }).to_string())
        }
    };
    Ok(ProxyResponse::from_response(
        request.request_origin(),
        json_response(status, body),
    ))
}

fn json_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = body.into_response();
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn split_dice(roll: &str) -> Option<(&str, &str)> {
    let (count, sides) = roll.split_once('d')?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if digits(count) && is_number(sides) {
        Some((count, sides))
    } else {
        None
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}
