#![deny(rust_2018_idioms)]

mod error;
mod input;

pub mod combinator;

pub use self::{
    error::{ParseError, ParseErrorKind, Position, PrintError},
    input::{Appendable, Consumable, Sliceable},
};

use self::combinator::{OrElse, Skip, Take};

/// A parser consumes a prefix of a mutable input cursor and yields an
/// output value.
///
/// On `Ok` the input has been advanced past the consumed region; on `Err`
/// the input is left exactly as it was before the call, so a sibling
/// alternative can be tried on it.
pub trait Parser<I, O> {
    fn parse(&self, input: &mut I) -> Result<O, ParseError>;

    fn by_ref(&self) -> ParserRef<'_, Self> {
        ParserRef { p: self }
    }

    /// One-way output transformation. The result parses but no longer
    /// prints; use [`convert`][Parser::convert] with a [`Conversion`] to
    /// keep the printer.
    fn map<O2, M>(self, m: M) -> Map<Self, M, O>
    where
        M: Fn(O) -> O2,
        Self: Sized,
    {
        Map { p: self, m, _o: std::marker::PhantomData }
    }

    /// Two-way output transformation through a [`Conversion`].
    fn convert<O2, C>(self, c: C) -> Convert<Self, C, O>
    where
        C: Conversion<O, O2>,
        Self: Sized,
    {
        Convert { p: self, c, _o: std::marker::PhantomData }
    }

    /// Sequences `self` then `q`, pairing both outputs.
    fn take<O2, Q>(self, q: Q) -> Take<Self, Q>
    where
        Q: Parser<I, O2>,
        Self: Sized,
    {
        Take::new(self, q)
    }

    /// Sequences `self` then `q`, keeping only `self`'s output.
    fn skip<Q>(self, q: Q) -> Skip<Self, Q>
    where
        Q: Parser<I, ()>,
        Self: Sized,
    {
        Skip::new(self, q)
    }

    /// Tries `self`; on failure the input is rolled back and `q` is tried.
    fn or_else<Q>(self, q: Q) -> OrElse<Self, Q>
    where
        Q: Parser<I, O>,
        Self: Sized,
    {
        OrElse::new(self, q)
    }

    /// Like [`parse`][Parser::parse], but additionally requires the whole
    /// input to be consumed.
    fn parse_all(&self, input: &mut I) -> Result<O, ParseError>
    where
        I: Consumable + Clone,
    {
        let snapshot = input.clone();
        let output = self.parse(input)?;
        if input.is_empty() {
            Ok(output)
        } else {
            let at = Position::Remaining(input.len());
            *input = snapshot;
            Err(ParseError::new(ParseErrorKind::UnconsumedRemainder, "end of input", at))
        }
    }
}

impl<I, O, F> Parser<I, O> for F
where
    F: Fn(&mut I) -> Result<O, ParseError>,
{
    fn parse(&self, input: &mut I) -> Result<O, ParseError> {
        self(input)
    }
}

/// A parser that can also run backwards: given an output value, it
/// reconstructs a minimal input that would parse to that value.
///
/// Minimal means the returned input is the [`Appendable`] identity
/// everywhere the output did not constrain it.
pub trait Printer<I, O>: Parser<I, O> {
    fn print(&self, output: &O) -> Result<I, PrintError>;
}

/// A pair of mutually inverse functions, `unapply(apply(a)) = a` for every
/// `a` in the parser's image.
///
/// `unapply` returns `None` for values outside the image; constructing and
/// matching one variant of a sum type is the canonical instance.
pub trait Conversion<A, B> {
    fn apply(&self, a: A) -> B;
    fn unapply(&self, b: &B) -> Option<A>;
}

pub fn conversion<A, B, F, G>(apply: F, unapply: G) -> FnConversion<F, G>
where
    F: Fn(A) -> B,
    G: Fn(&B) -> Option<A>,
{
    FnConversion { apply, unapply }
}

pub struct FnConversion<F, G> {
    apply: F,
    unapply: G,
}

impl<A, B, F, G> Conversion<A, B> for FnConversion<F, G>
where
    F: Fn(A) -> B,
    G: Fn(&B) -> Option<A>,
{
    fn apply(&self, a: A) -> B {
        (self.apply)(a)
    }

    fn unapply(&self, b: &B) -> Option<A> {
        (self.unapply)(b)
    }
}

pub struct ParserRef<'p, P: ?Sized> {
    p: &'p P,
}

impl<I, O, P> Parser<I, O> for ParserRef<'_, P>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &mut I) -> Result<O, ParseError> {
        self.p.parse(input)
    }
}

impl<I, O, P> Printer<I, O> for ParserRef<'_, P>
where
    P: Printer<I, O>,
{
    fn print(&self, output: &O) -> Result<I, PrintError> {
        self.p.print(output)
    }
}

pub struct Map<P, M, O> {
    p: P,
    m: M,
    _o: std::marker::PhantomData<fn() -> O>,
}

impl<I, O, O2, P, M> Parser<I, O2> for Map<P, M, O>
where
    P: Parser<I, O>,
    M: Fn(O) -> O2,
{
    fn parse(&self, input: &mut I) -> Result<O2, ParseError> {
        let output = self.p.parse(input)?;
        Ok((self.m)(output))
    }
}

pub struct Convert<P, C, O> {
    p: P,
    c: C,
    _o: std::marker::PhantomData<fn() -> O>,
}

impl<I, A, B, P, C> Parser<I, B> for Convert<P, C, A>
where
    P: Parser<I, A>,
    C: Conversion<A, B>,
{
    fn parse(&self, input: &mut I) -> Result<B, ParseError> {
        let output = self.p.parse(input)?;
        Ok(self.c.apply(output))
    }
}

impl<I, A, B, P, C> Printer<I, B> for Convert<P, C, A>
where
    P: Printer<I, A>,
    C: Conversion<A, B>,
{
    fn print(&self, output: &B) -> Result<I, PrintError> {
        let inner = self.c.unapply(output).ok_or(PrintError::UnprintableBranch)?;
        self.p.print(&inner)
    }
}
