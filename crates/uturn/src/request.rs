//! The compound input that routers consume: one slice per orthogonal
//! request aspect, each owned by exactly one family of parsers.

use uturn_core::Appendable;

/// The method slice of a [`Request`].
///
/// `Default` reads as `GET` the first time a method parser consumes it;
/// `Consumed` matches no method parser at all, so the slot can be claimed
/// at most once per parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MethodSlot {
    #[default]
    Default,
    Explicit(String),
    Consumed,
}

impl MethodSlot {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            MethodSlot::Explicit(m) => Some(m),
            MethodSlot::Default | MethodSlot::Consumed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Request {
    pub method: MethodSlot,
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// The method as the adapter contract sees it: `None` unless a method
    /// was explicitly given and not yet consumed.
    pub fn method(&self) -> Option<&str> {
        self.method.as_option()
    }

    /// Case-insensitive header lookup; names are stored as received.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(stored, _)| stored.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Appendable for Request {
    fn empty() -> Self {
        Self::default()
    }

    fn append(mut self, other: Self) -> Self {
        // the method slice is left biased: the first explicit method wins
        if !matches!(self.method, MethodSlot::Explicit(_)) {
            self.method = other.method;
        }
        self.path.extend(other.path);
        self.query.extend(other.query);
        self.headers.extend(other.headers);
        self.body.extend(other.body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Request {
        Request {
            method: MethodSlot::Explicit("POST".to_owned()),
            path: vec!["a".to_owned(), "b".to_owned()],
            query: vec![("k".to_owned(), "v".to_owned())],
            headers: vec![("X-One".to_owned(), "1".to_owned())],
            body: b"body".to_vec(),
        }
    }

    #[test]
    fn empty_is_the_append_identity() {
        let req = sample();
        assert_eq!(Request::empty().append(req.clone()), req);
        assert_eq!(req.clone().append(Request::empty()), req);
    }

    #[test]
    fn append_concatenates_the_list_slices() {
        let merged = sample().append(Request {
            path: vec!["c".to_owned()],
            query: vec![("k2".to_owned(), "v2".to_owned())],
            body: b"!".to_vec(),
            ..Request::default()
        });
        assert_eq!(merged.path, ["a", "b", "c"]);
        assert_eq!(merged.query.len(), 2);
        assert_eq!(merged.body, b"body!");
    }

    #[test]
    fn method_merge_is_left_biased() {
        let left = sample();
        let right = Request {
            method: MethodSlot::Explicit("DELETE".to_owned()),
            ..Request::default()
        };
        assert_eq!(left.append(right).method(), Some("POST"));

        let unset = Request::default();
        let explicit = Request {
            method: MethodSlot::Explicit("PUT".to_owned()),
            ..Request::default()
        };
        assert_eq!(unset.append(explicit).method(), Some("PUT"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = sample();
        assert_eq!(req.header("x-one"), Some("1"));
        assert_eq!(req.header("X-ONE"), Some("1"));
        assert_eq!(req.header("x-two"), None);
    }
}
