//! Parameter reconciliation
//!
//! Binds a call's positional parameters and a keyword-parameter map to a
//! handler's declared signature, producing the exact ordered argument
//! list the handler is invoked with. Positional binding is strict:
//! leading slots are filled in order, remaining slots are looked up by
//! name, and trailing slots fall back to registration-time defaults.

use std::collections::HashMap;

use crate::value::Value;

/// A handler's declared parameter list.
///
/// `names` excludes the request slot; the request reaches every handler
/// out of band. `defaults` aligns with the trailing `names`, so a
/// signature with three names and one default has two required slots.
///
/// Signatures are built once, when a handler is registered, never per
/// request.
#[derive(Debug, Clone)]
pub struct Signature {
    names: Vec<String>,
    defaults: Vec<Value>,
}

#[derive(Debug)]
pub enum SignatureError {
    /// More defaults than declared parameters.
    TooManyDefaults { params: usize, defaults: usize },
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::TooManyDefaults { params, defaults } => write!(
                f,
                "{} defaults declared for {} parameters",
                defaults, params
            ),
        }
    }
}

impl std::error::Error for SignatureError {}

impl Signature {
    /// Builds a signature, validating that defaults fit the parameter
    /// list.
    pub fn new<N, S>(names: N, defaults: Vec<Value>) -> Result<Self, SignatureError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if defaults.len() > names.len() {
            return Err(SignatureError::TooManyDefaults {
                params: names.len(),
                defaults: defaults.len(),
            });
        }
        Ok(Self { names, defaults })
    }

    /// A signature with no parameters at all.
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            defaults: Vec::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of leading slots that must be filled by a positional or
    /// keyword parameter.
    pub fn required(&self) -> usize {
        self.names.len() - self.defaults.len()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MapplyError {
    /// More positional parameters than declared slots.
    TooManyArguments { given: usize, accepted: usize },
    /// A required slot had neither a positional nor a keyword parameter.
    MissingArgument(String),
}

impl std::fmt::Display for MapplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapplyError::TooManyArguments { given, accepted } => {
                write!(f, "too many arguments ({} given, {} accepted)", given, accepted)
            }
            MapplyError::MissingArgument(name) => {
                write!(f, "argument {} was omitted", name)
            }
        }
    }
}

impl std::error::Error for MapplyError {}

/// Computes the ordered argument list for an invocation.
///
/// Positional parameters fill the leading slots exactly as given; a slot
/// filled positionally is never re-read from `keywords`, even when a
/// same-named key exists. Each remaining slot takes its keyword value if
/// present, otherwise its aligned default; a required slot with neither
/// fails. Keyword keys that match no slot are ignored.
pub fn mapply(
    signature: &Signature,
    positional: &[Value],
    keywords: &HashMap<String, Value>,
) -> Result<Vec<Value>, MapplyError> {
    let accepted = signature.names.len();
    if positional.len() > accepted {
        return Err(MapplyError::TooManyArguments {
            given: positional.len(),
            accepted,
        });
    }

    let required = signature.required();
    let mut args = positional.to_vec();
    for index in positional.len()..accepted {
        let name = &signature.names[index];
        match keywords.get(name) {
            Some(value) => args.push(value.clone()),
            None if index < required => {
                return Err(MapplyError::MissingArgument(name.clone()));
            }
            None => args.push(signature.defaults[index - required].clone()),
        }
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(names: &[&str], defaults: Vec<Value>) -> Signature {
        Signature::new(names.iter().copied(), defaults).unwrap()
    }

    fn kw(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_positional_only() {
        let signature = sig(&["one", "two"], vec![]);
        let args = mapply(
            &signature,
            &[Value::Int(1), Value::Int(2)],
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_keyword_fills_remaining_slot() {
        let signature = sig(&["one", "two"], vec![Value::Int(2)]);
        let args = mapply(&signature, &[], &kw(&[("one", Value::Int(1))])).unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_positional_binding_wins_over_keyword() {
        // A slot already filled positionally is never re-read by name.
        let signature = sig(&["one", "two"], vec![]);
        let args = mapply(
            &signature,
            &[Value::Int(10)],
            &kw(&[("one", Value::Int(99)), ("two", Value::Int(2))]),
        )
        .unwrap();
        assert_eq!(args, vec![Value::Int(10), Value::Int(2)]);
    }

    #[test]
    fn test_too_many_positional() {
        let signature = sig(&["one", "two"], vec![]);
        let result = mapply(
            &signature,
            &[Value::Int(1), Value::Int(2), Value::Int(3)],
            &kw(&[("one", Value::Int(1))]),
        );
        assert_eq!(
            result.unwrap_err(),
            MapplyError::TooManyArguments {
                given: 3,
                accepted: 2
            }
        );
    }

    #[test]
    fn test_missing_required_argument() {
        let signature = sig(&["what"], vec![]);
        let result = mapply(&signature, &[], &HashMap::new());
        assert_eq!(
            result.unwrap_err(),
            MapplyError::MissingArgument("what".to_string())
        );
    }

    #[test]
    fn test_defaults_align_to_trailing_slots() {
        let signature = sig(
            &["a", "b", "c"],
            vec![Value::Int(20), Value::Int(30)],
        );
        let args = mapply(&signature, &[Value::Int(1)], &HashMap::new()).unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(20), Value::Int(30)]);

        let args = mapply(
            &signature,
            &[Value::Int(1)],
            &kw(&[("c", Value::Int(99))]),
        )
        .unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(20), Value::Int(99)]);
    }

    #[test]
    fn test_unknown_keywords_ignored() {
        let signature = sig(&["a"], vec![]);
        let args = mapply(
            &signature,
            &[],
            &kw(&[("a", Value::Int(1)), ("stray", Value::Int(9))]),
        )
        .unwrap();
        assert_eq!(args, vec![Value::Int(1)]);
    }

    #[test]
    fn test_empty_signature_accepts_nothing() {
        let signature = Signature::empty();
        assert!(mapply(&signature, &[], &HashMap::new()).unwrap().is_empty());
        assert!(matches!(
            mapply(&signature, &[Value::Int(1)], &HashMap::new()),
            Err(MapplyError::TooManyArguments { .. })
        ));
    }

    #[test]
    fn test_required_slot_fed_by_keyword_after_positional_prefix() {
        // Slots past the positional prefix but still required must come
        // from keywords.
        let signature = sig(&["a", "b", "c"], vec![Value::Int(3)]);
        let result = mapply(&signature, &[Value::Int(1)], &HashMap::new());
        assert_eq!(
            result.unwrap_err(),
            MapplyError::MissingArgument("b".to_string())
        );

        let args = mapply(
            &signature,
            &[Value::Int(1)],
            &kw(&[("b", Value::Int(2))]),
        )
        .unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_signature_validation() {
        let result = Signature::new(["a"], vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(
            result,
            Err(SignatureError::TooManyDefaults {
                params: 1,
                defaults: 2
            })
        ));
    }
}
