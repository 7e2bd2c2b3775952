//! Single-object lookup contract for entity managers.

use thiserror::Error;

/// Failure of a single-object lookup.
#[derive(Debug, Error)]
pub enum ObjectLookupError {
    #[error("{entity} matching query does not exist.")]
    DoesNotExist { entity: String },
    #[error("get() returned more than one {entity} -- it returned {count}!")]
    MultipleObjectsReturned { entity: String, count: usize },
    #[error("object lookup failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Manager able to fetch exactly one object matching a filter.
pub trait ObjectManager {
    type Object;
    type Filter: ?Sized;

    /// Fetch the single object matching `filter`.
    fn get(&self, filter: &Self::Filter) -> Result<Self::Object, ObjectLookupError>;

    /// Like [`Self::get`], but a missing object is `Ok(None)`.
    ///
    /// Every other error, including multiple matches, is propagated.
    fn get_or_none(&self, filter: &Self::Filter) -> Result<Option<Self::Object>, ObjectLookupError> {
        match self.get(filter) {
            Ok(object) => Ok(Some(object)),
            Err(ObjectLookupError::DoesNotExist { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlugManager {
        l_slugs: Vec<&'static str>,
        if_backend_down: bool,
    }

    impl ObjectManager for SlugManager {
        type Object = String;
        type Filter = str;

        fn get(&self, filter: &str) -> Result<String, ObjectLookupError> {
            if self.if_backend_down {
                return Err(ObjectLookupError::Backend("connection refused".into()));
            }
            let l_matches: Vec<&&str> = self.l_slugs.iter().filter(|s| **s == filter).collect();
            match l_matches.len() {
                0 => Err(ObjectLookupError::DoesNotExist {
                    entity: "Post".to_string(),
                }),
                1 => Ok(l_matches[0].to_string()),
                n => Err(ObjectLookupError::MultipleObjectsReturned {
                    entity: "Post".to_string(),
                    count: n,
                }),
            }
        }
    }

    #[test]
    fn get_or_none_swallows_only_missing_objects() {
        let manager = SlugManager {
            l_slugs: vec!["hello", "dup", "dup"],
            if_backend_down: false,
        };

        assert_eq!(manager.get_or_none("hello").expect("lookup"), Some("hello".to_string()));
        assert_eq!(manager.get_or_none("absent").expect("lookup"), None);

        let err = manager.get_or_none("dup").unwrap_err();
        assert_eq!(err.to_string(), "get() returned more than one Post -- it returned 2!");

        let down = SlugManager {
            l_slugs: vec![],
            if_backend_down: true,
        };
        assert!(matches!(
            down.get_or_none("hello"),
            Err(ObjectLookupError::Backend(_))
        ));
    }
}
