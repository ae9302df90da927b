//! Parsers over one slice of a [`Request`] each.
//!
//! Every parser here projects the compound input onto a single field,
//! delegates to an inner parser over that field's element type, and clears
//! the part it matched. Failure leaves the whole request untouched.

use crate::request::{MethodSlot, Request};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use uturn_core::{
    combinator::{starts_with, StartsWith},
    Consumable, ParseError, ParseErrorKind, Parser, Position, PrintError, Printer,
};

pub fn method(name: &str) -> Method {
    Method { name: name.to_ascii_uppercase() }
}

pub struct Method {
    name: String,
}

impl Parser<Request, ()> for Method {
    fn parse(&self, req: &mut Request) -> Result<(), ParseError> {
        let matches = match &req.method {
            // an unset method reads as GET, once
            MethodSlot::Default => self.name == "GET",
            MethodSlot::Explicit(m) => m.eq_ignore_ascii_case(&self.name),
            MethodSlot::Consumed => false,
        };
        if matches {
            req.method = MethodSlot::Consumed;
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                format!("method {}", self.name),
                Position::Field("method"),
            ))
        }
    }
}

impl Printer<Request, ()> for Method {
    fn print(&self, _output: &()) -> Result<Request, PrintError> {
        Ok(Request {
            method: MethodSlot::Explicit(self.name.clone()),
            ..Request::default()
        })
    }
}

pub fn path_component<P>(inner: P) -> PathComponent<P> {
    PathComponent { inner }
}

/// Matches the first path segment by running `inner` over the entire
/// segment; the segment is removed on success.
pub struct PathComponent<P> {
    inner: P,
}

impl<O, P> Parser<Request, O> for PathComponent<P>
where
    P: Parser<String, O>,
{
    fn parse(&self, req: &mut Request) -> Result<O, ParseError> {
        let mut segment = match req.path.first() {
            Some(segment) => segment.clone(),
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::EmptyInput,
                    "a path segment",
                    Position::Field("path"),
                ))
            }
        };
        let output = self.inner.parse(&mut segment)?;
        if !segment.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                "the path segment to be consumed entirely",
                Position::Field("path"),
            ));
        }
        req.path.remove(0);
        Ok(output)
    }
}

impl<O, P> Printer<Request, O> for PathComponent<P>
where
    P: Printer<String, O>,
{
    fn print(&self, output: &O) -> Result<Request, PrintError> {
        let segment = self.inner.print(output)?;
        // an empty segment would vanish in the URL; drop it here already
        let path = if segment.is_empty() { Vec::new() } else { vec![segment] };
        Ok(Request { path, ..Request::default() })
    }
}

/// The common static-segment case: `path_literal("episodes")` matches and
/// prints exactly that segment.
pub fn path_literal(name: &str) -> PathComponent<StartsWith<String>> {
    path_component(starts_with(name.to_owned()))
}

pub fn path_end() -> PathEnd {
    PathEnd
}

/// Succeeds when no path segments are left; consumes nothing.
pub struct PathEnd;

impl Parser<Request, ()> for PathEnd {
    fn parse(&self, req: &mut Request) -> Result<(), ParseError> {
        if req.path.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                "end of the path",
                Position::Field("path"),
            ))
        }
    }
}

impl Printer<Request, ()> for PathEnd {
    fn print(&self, _output: &()) -> Result<Request, PrintError> {
        Ok(Request::default())
    }
}

pub fn query_item<P>(name: &str, inner: P) -> QueryItem<P> {
    QueryItem { name: name.to_owned(), inner }
}

/// Matches the first query pair whose name equals `name` exactly
/// (case-sensitive); only that pair is removed on success.
pub struct QueryItem<P> {
    name: String,
    inner: P,
}

impl<O, P> Parser<Request, O> for QueryItem<P>
where
    P: Parser<String, O>,
{
    fn parse(&self, req: &mut Request) -> Result<O, ParseError> {
        let index = match req.query.iter().position(|(name, _)| *name == self.name) {
            Some(index) => index,
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedInput,
                    format!("query parameter `{}`", self.name),
                    Position::Field("query"),
                ))
            }
        };
        let mut value = req.query[index].1.clone();
        let output = self.inner.parse(&mut value)?;
        if !value.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                format!("query parameter `{}` to be consumed entirely", self.name),
                Position::Field("query"),
            ));
        }
        req.query.remove(index);
        Ok(output)
    }
}

impl<O, P> Printer<Request, O> for QueryItem<P>
where
    P: Printer<String, O>,
{
    fn print(&self, output: &O) -> Result<Request, PrintError> {
        Ok(Request {
            query: vec![(self.name.clone(), self.inner.print(output)?)],
            ..Request::default()
        })
    }
}

pub fn body<P>(inner: P) -> Body<P> {
    Body { inner }
}

/// Runs `inner` over the body buffer and requires it to consume every
/// byte; the body is emptied on success.
pub struct Body<P> {
    inner: P,
}

impl<O, P> Parser<Request, O> for Body<P>
where
    P: Parser<Vec<u8>, O>,
{
    fn parse(&self, req: &mut Request) -> Result<O, ParseError> {
        let mut buf = req.body.clone();
        let output = self.inner.parse(&mut buf)?;
        if !buf.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                "the body to be consumed entirely",
                Position::Field("body"),
            ));
        }
        req.body.clear();
        Ok(output)
    }
}

impl<O, P> Printer<Request, O> for Body<P>
where
    P: Printer<Vec<u8>, O>,
{
    fn print(&self, output: &O) -> Result<Request, PrintError> {
        Ok(Request {
            body: self.inner.print(output)?,
            ..Request::default()
        })
    }
}

pub fn json<T>() -> Json<T>
where
    T: Serialize + DeserializeOwned,
{
    Json(PhantomData)
}

/// A body leaf: the whole buffer as one JSON document.
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T> Parser<Vec<u8>, T> for Json<T>
where
    T: DeserializeOwned,
{
    fn parse(&self, input: &mut Vec<u8>) -> Result<T, ParseError> {
        let parsed = serde_json::from_slice(input);
        match parsed {
            Ok(value) => {
                input.clear();
                Ok(value)
            }
            Err(_) => Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                "a JSON document",
                Position::Remaining(Consumable::len(input)),
            )),
        }
    }
}

impl<T> Printer<Vec<u8>, T> for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn print(&self, output: &T) -> Result<Vec<u8>, PrintError> {
        serde_json::to_vec(output).map_err(|_| PrintError::UnprintableBranch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uturn_core::combinator::{int, rest};

    fn request(method: MethodSlot, path: &[&str], query: &[(&str, &str)]) -> Request {
        Request {
            method,
            path: path.iter().map(|s| (*s).to_owned()).collect(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            ..Request::default()
        }
    }

    #[test]
    fn method_defaults_to_get_once() {
        let mut req = request(MethodSlot::Default, &[], &[]);
        assert!(method("GET").parse(&mut req).is_ok());
        assert_eq!(req.method, MethodSlot::Consumed);

        // the slot cannot be claimed a second time
        assert!(method("GET").parse(&mut req).is_err());
    }

    #[test]
    fn method_match_is_case_insensitive() {
        for given in ["get", "Get", "GET"] {
            let mut req = request(MethodSlot::Explicit(given.to_owned()), &[], &[]);
            assert!(method("GET").parse(&mut req).is_ok());
        }
    }

    #[test]
    fn method_mismatch_leaves_request_unchanged() {
        let mut req = request(MethodSlot::Explicit("POST".to_owned()), &["x"], &[]);
        let before = req.clone();
        assert_matches!(
            method("GET").parse(&mut req),
            Err(ParseError { at: Position::Field("method"), .. })
        );
        assert_eq!(req, before);
    }

    #[test]
    fn path_component_requires_full_segment() {
        let mut req = request(MethodSlot::Default, &["12x"], &[]);
        let before = req.clone();
        assert!(path_component(int::<u32>()).parse(&mut req).is_err());
        assert_eq!(req, before);

        let mut req = request(MethodSlot::Default, &["12"], &[]);
        assert_eq!(path_component(int::<u32>()).parse(&mut req), Ok(12));
        assert!(req.path.is_empty());
    }

    #[test]
    fn path_component_print_drops_empty_segments() {
        let printed = path_component(rest::<String>()).print(&String::new()).unwrap();
        assert!(printed.path.is_empty());
    }

    #[test]
    fn query_item_takes_only_the_first_match() {
        let mut req = request(MethodSlot::Default, &[], &[("q", "a"), ("q", "b")]);
        assert_eq!(query_item("q", rest::<String>()).parse(&mut req), Ok("a".to_owned()));
        assert_eq!(req.query, [("q".to_owned(), "b".to_owned())]);
    }

    #[test]
    fn query_item_name_match_is_exact() {
        let mut req = request(MethodSlot::Default, &[], &[("Q", "a")]);
        assert!(query_item("q", rest::<String>()).parse(&mut req).is_err());
        assert_eq!(req.query.len(), 1);
    }

    #[test]
    fn body_must_be_consumed_entirely() {
        let mut req = Request { body: b"abc".to_vec(), ..Request::default() };
        let before = req.clone();
        assert_matches!(
            body(starts_with(b"ab".to_vec())).parse(&mut req),
            Err(ParseError { at: Position::Field("body"), .. })
        );
        assert_eq!(req, before);

        assert!(body(starts_with(b"abc".to_vec())).parse(&mut req).is_ok());
        assert!(req.body.is_empty());
    }
}
