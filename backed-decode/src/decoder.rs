//! First-class decoders and the context they run in

use crate::date::DateStrategy;
use crate::document::Document;
use crate::resolve::Resolver;
use backed_path::{DecodingOptions, Limits, Path, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::trace;

/// What a decoder knows besides the document
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    /// Path declared explicitly for the value
    pub given_path: Option<Path>,
    /// Path derived from where the value is bound (a field's name)
    pub inferred_path: Option<Path>,
    /// Decoding flags
    pub options: DecodingOptions,
    /// Resolution limits
    pub limits: Limits,
}

impl DecodeContext {
    /// Context with an explicit path and default options
    pub fn at(path: impl Into<Path>) -> Self {
        Self {
            given_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Return a copy using `options`
    pub fn with_options(mut self, options: DecodingOptions) -> Self {
        self.options = options;
        self
    }

    /// Return a copy using `limits`
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The path to decode: the given path, else the inferred one, else the root
    pub fn path(&self) -> Path {
        self.given_path
            .as_ref()
            .or(self.inferred_path.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// A resolver over `document` honouring these limits
    pub fn resolver<'a, D: Document>(&self, document: &'a D) -> Resolver<'a, D> {
        Resolver::new(document).with_limits(self.limits)
    }
}

type DecodeFn<T, D> = dyn Fn(&D, &DecodeContext) -> Result<T> + Send + Sync;

/// A reusable decoding function `(document, context) -> T`
///
/// Decoders compose: [`Decoder::or_else`] tries a second decoder against the
/// same document and context when the first fails, which is how mutually
/// exclusive encodings of one value are combined.
///
/// ```
/// use backed_decode::{DecodeContext, Decoder};
/// use backed_path::BackedError;
/// use serde_json::json;
///
/// let number = Decoder::<f64>::value();
/// let text = Decoder::<String>::value()
///     .and_then(|s| s.trim().parse::<f64>().map_err(|e| BackedError::custom(e.to_string())));
/// let temperature = number.or_else(text);
///
/// let doc = json!({"temp": " 21.5"});
/// let value = temperature.decode(&doc, &DecodeContext::at("temp")).unwrap();
/// assert_eq!(value, 21.5);
/// ```
pub struct Decoder<T, D = Value> {
    decode: Arc<DecodeFn<T, D>>,
}

impl<T, D> Clone for Decoder<T, D> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T, D> fmt::Debug for Decoder<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder").finish_non_exhaustive()
    }
}

impl<T: 'static, D: Document + 'static> Decoder<T, D> {
    /// Wrap an arbitrary decoding function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&D, &DecodeContext) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(f),
        }
    }

    /// Run the decoder
    pub fn decode(&self, document: &D, context: &DecodeContext) -> Result<T> {
        (self.decode)(document, context)
    }

    /// Try `self`, then `other` on any failure
    pub fn or_else(self, other: Decoder<T, D>) -> Self {
        Self::custom(move |document, context| {
            self.decode(document, context).or_else(|e| {
                trace!(error = %e, "decoder failed, trying fallback");
                other.decode(document, context)
            })
        })
    }

    /// Transform the decoded value
    pub fn map<U: 'static, F>(self, f: F) -> Decoder<U, D>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Decoder::custom(move |document, context| self.decode(document, context).map(&f))
    }

    /// Transform the decoded value with a fallible function
    pub fn and_then<U: 'static, F>(self, f: F) -> Decoder<U, D>
    where
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        Decoder::custom(move |document, context| self.decode(document, context).and_then(&f))
    }

    /// Decode into `Some`, or `None` when the path does not match the document
    /// or points at an explicit `null`
    ///
    /// Values that are found but fail to decode still fail.
    pub fn optional(self) -> Decoder<Option<T>, D> {
        Decoder::custom(move |document, context| match self.decode(document, context) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_shape_error() => Ok(None),
            Err(e) => {
                let is_null = context
                    .resolver(document)
                    .resolve(&context.path(), |located| Ok(located.is_null()))
                    .unwrap_or(false);
                if is_null {
                    Ok(None)
                } else {
                    Err(e)
                }
            }
        })
    }
}

impl<T: DeserializeOwned + 'static, D: Document + 'static> Decoder<T, D> {
    /// Decode a single value at the context's path
    pub fn value() -> Self {
        Self::custom(|document, context| context.resolver(document).value(&context.path()))
    }
}

impl<T: DeserializeOwned + 'static, D: Document + 'static> Decoder<Vec<T>, D> {
    /// Decode an array at the context's path, honouring the lossy flag
    pub fn array() -> Self {
        Self::custom(|document, context| {
            context
                .resolver(document)
                .array(&context.path(), context.options)
        })
    }
}

impl<T, D> Decoder<HashSet<T>, D>
where
    T: DeserializeOwned + Eq + Hash + 'static,
    D: Document + 'static,
{
    /// Decode a set at the context's path, honouring the lossy flag
    pub fn set() -> Self {
        Self::custom(|document, context| {
            context
                .resolver(document)
                .set(&context.path(), context.options)
        })
    }
}

impl<D: Document + 'static> Decoder<DateTime<Utc>, D> {
    /// Decode a date at the context's path
    pub fn date(strategy: DateStrategy) -> Self {
        Self::custom(move |document, context| {
            context.resolver(document).date(&context.path(), &strategy)
        })
    }
}

impl<D: Document + 'static> Decoder<Vec<DateTime<Utc>>, D> {
    /// Decode a sequence of dates at the context's path
    pub fn dates(strategy: DateStrategy) -> Self {
        Self::custom(move |document, context| {
            context
                .resolver(document)
                .dates(&context.path(), &strategy, context.options)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backed_path::BackedError;
    use serde_json::json;

    #[test]
    fn context_path_precedence() {
        let mut context = DecodeContext::default();
        assert_eq!(context.path(), Path::root());

        context.inferred_path = Some(Path::from("name"));
        assert_eq!(context.path(), Path::from("name"));

        context.given_path = Some(Path::from("full_name"));
        assert_eq!(context.path(), Path::from("full_name"));
    }

    #[test]
    fn or_else_tries_second_decoder_on_same_context() {
        let hsba = Decoder::<f64>::custom(|document: &Value, context| {
            context.resolver(document).value(&context.path().key("hue"))
        });
        let rgba = Decoder::<f64>::custom(|document: &Value, context| {
            context.resolver(document).value(&context.path().key("red"))
        });
        let either = hsba.or_else(rgba);

        let doc = json!({"color": {"red": 255}});
        assert_eq!(either.decode(&doc, &DecodeContext::at("color")).unwrap(), 255.0);

        let doc = json!({"color": {"green": 255}});
        assert!(matches!(
            either.decode(&doc, &DecodeContext::at("color")),
            Err(BackedError::KeyNotFound { key }) if key == "red"
        ));
    }

    #[test]
    fn map_and_and_then() {
        let doc = json!({"n": 21});
        let doubled = Decoder::<i64>::value().map(|n| n * 2);
        assert_eq!(doubled.decode(&doc, &DecodeContext::at("n")).unwrap(), 42);

        let checked = Decoder::<i64>::value().and_then(|n| {
            if n > 100 {
                Ok(n)
            } else {
                Err(BackedError::custom("too small"))
            }
        });
        assert!(matches!(
            checked.decode(&doc, &DecodeContext::at("n")),
            Err(BackedError::Custom(_))
        ));
    }

    #[test]
    fn optional_only_absorbs_shape_errors() {
        let doc = json!({"n": "x"});
        let optional = Decoder::<i64>::value().optional();
        assert_eq!(optional.decode(&doc, &DecodeContext::at("missing")).unwrap(), None);
        assert!(optional.decode(&doc, &DecodeContext::at("n")).is_err());
    }

    #[test]
    fn optional_treats_null_as_absent() {
        let doc = json!({"nickname": null, "counts": {"apples": null}, "tags": [null]});
        let optional = Decoder::<String>::value().optional();
        assert_eq!(optional.decode(&doc, &DecodeContext::at("nickname")).unwrap(), None);
        assert_eq!(
            optional
                .decode(&doc, &DecodeContext::at(Path::from("counts").all_values().index(0)))
                .unwrap(),
            None
        );
        assert_eq!(
            optional
                .decode(&doc, &DecodeContext::at(Path::from("tags").index(0)))
                .unwrap(),
            None
        );

        let keys = Decoder::<i64>::value().optional();
        assert!(keys
            .decode(&doc, &DecodeContext::at(Path::from("counts").all_keys().index(0)))
            .is_err());
    }

    #[test]
    fn collection_decoders_follow_options() {
        let doc = json!({"values": [12, "34", 56, "78"]});
        let context = DecodeContext::at("values");

        let strict = Decoder::<Vec<String>>::array();
        assert!(strict.decode(&doc, &context).is_err());

        let lossy = context.clone().with_options(DecodingOptions::LOSSY);
        assert_eq!(strict.decode(&doc, &lossy).unwrap(), vec!["34", "78"]);

        let set = Decoder::<HashSet<i64>>::set();
        assert_eq!(set.decode(&doc, &lossy).unwrap(), HashSet::from([12, 56]));
    }

    #[test]
    fn date_decoders() {
        let doc = json!({"start": 1613984296000_i64, "all": [1613984296, "N/A"]});
        let start = Decoder::<DateTime<Utc>>::date(DateStrategy::MillisecondsSince1970)
            .decode(&doc, &DecodeContext::at("start"))
            .unwrap();
        assert_eq!(start.timestamp(), 1613984296);

        let all = Decoder::<Vec<DateTime<Utc>>>::dates(DateStrategy::SecondsSince1970)
            .decode(
                &doc,
                &DecodeContext::at("all").with_options(DecodingOptions::LOSSY),
            )
            .unwrap();
        assert_eq!(all.len(), 1);
    }
}
