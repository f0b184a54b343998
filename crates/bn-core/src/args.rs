//! Calling conventions: how a method's parameter object becomes the
//! `params` array of a JSON-RPC request.
//!
//! Bitcoin SV node methods take either an ordered list of positional
//! arguments, some optional, or a single JSON object/array argument. Each
//! method picks one explicitly; nothing is inferred from field names.

use serde::Serialize;

use crate::error::CoreError;

/// One positional slot.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Set(serde_json::Value),
    /// Unset optional argument. Sent as `filler` only when a later slot is
    /// set, otherwise dropped.
    Unset { filler: serde_json::Value },
}

/// Ordered positional arguments. Trailing unset slots are elided; an unset
/// slot before a set one is sent as its filler to keep positions aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Positional {
    slots: Vec<Slot>,
}

impl Positional {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required argument.
    pub fn arg(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.slots.push(Slot::Set(value.into()));
        self
    }

    /// Optional argument, `null` when it has to be padded.
    pub fn opt<V: Into<serde_json::Value>>(self, value: Option<V>) -> Self {
        self.opt_or(value, serde_json::Value::Null)
    }

    /// Optional argument whose padding is the node's documented default
    /// rather than `null`.
    pub fn opt_or<V: Into<serde_json::Value>>(
        mut self,
        value: Option<V>,
        filler: impl Into<serde_json::Value>,
    ) -> Self {
        self.slots.push(match value {
            Some(value) => Slot::Set(value.into()),
            None => Slot::Unset {
                filler: filler.into(),
            },
        });
        self
    }

    fn into_params(self) -> Vec<serde_json::Value> {
        let last_set = self
            .slots
            .iter()
            .rposition(|slot| matches!(slot, Slot::Set(_)));
        let keep = last_set.map_or(0, |idx| idx + 1);

        self.slots
            .into_iter()
            .take(keep)
            .map(|slot| match slot {
                Slot::Set(value) => value,
                Slot::Unset { filler } => filler,
            })
            .collect()
    }
}

/// How a method's parameters are laid out on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum CallingConvention {
    Positional(Positional),
    /// The whole parameter object is one argument, never flattened.
    Single(serde_json::Value),
}

impl CallingConvention {
    pub fn none() -> Self {
        Self::Positional(Positional::new())
    }

    /// Serialize `params` as the single argument.
    pub fn single<T: Serialize>(params: &T) -> Result<Self, CoreError> {
        serde_json::to_value(params)
            .map(Self::Single)
            .map_err(|e| CoreError::InvalidParams(format!("serialize parameter object: {e}")))
    }

    pub fn into_params(self) -> Vec<serde_json::Value> {
        match self {
            Self::Positional(positional) => positional.into_params(),
            Self::Single(value) => vec![value],
        }
    }
}

impl From<Positional> for CallingConvention {
    fn from(positional: Positional) -> Self {
        Self::Positional(positional)
    }
}
