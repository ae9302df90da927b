use crate::{
    Appendable, Consumable, ParseError, ParseErrorKind, Parser, Position, PrintError, Printer,
    Sliceable,
};
use either::Either;
use std::{fmt, marker::PhantomData, num::IntErrorKind, str::FromStr};

fn position_of<I: Consumable>(input: &I) -> Position {
    if input.is_empty() {
        Position::Eoi
    } else {
        Position::Remaining(input.len())
    }
}

pub fn starts_with<I>(prefix: I) -> StartsWith<I>
where
    I: Consumable + fmt::Debug,
{
    StartsWith { prefix }
}

pub struct StartsWith<I> {
    prefix: I,
}

impl<I> Parser<I, ()> for StartsWith<I>
where
    I: Consumable + fmt::Debug,
{
    fn parse(&self, input: &mut I) -> Result<(), ParseError> {
        if input.strip_prefix(&self.prefix) {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::ExpectedLiteral,
                format!("{:?}", self.prefix),
                position_of(input),
            ))
        }
    }
}

impl<I> Printer<I, ()> for StartsWith<I>
where
    I: Consumable + Clone + fmt::Debug,
{
    fn print(&self, _output: &()) -> Result<I, PrintError> {
        Ok(self.prefix.clone())
    }
}

pub fn first<I>() -> First<I>
where
    I: Consumable,
{
    First(PhantomData)
}

pub struct First<I>(PhantomData<fn() -> I>);

impl<I> Parser<I, I::Element> for First<I>
where
    I: Consumable,
{
    fn parse(&self, input: &mut I) -> Result<I::Element, ParseError> {
        input.split_first().ok_or_else(|| {
            ParseError::new(ParseErrorKind::EmptyInput, "any element", Position::Eoi)
        })
    }
}

pub fn rest<I>() -> Rest<I>
where
    I: Sliceable,
{
    Rest(PhantomData)
}

pub struct Rest<I>(PhantomData<fn() -> I>);

impl<I> Parser<I, I> for Rest<I>
where
    I: Sliceable,
{
    fn parse(&self, input: &mut I) -> Result<I, ParseError> {
        Ok(input.take_all())
    }
}

impl<I> Printer<I, I> for Rest<I>
where
    I: Sliceable + Clone,
{
    fn print(&self, output: &I) -> Result<I, PrintError> {
        Ok(output.clone())
    }
}

/// Integer types [`int`] can parse and print.
pub trait Integer: FromStr<Err = std::num::ParseIntError> + fmt::Display {
    /// Whether a leading sign is part of the syntax.
    const SIGNED: bool;
}

macro_rules! impl_integer {
    ($signed:expr => $($ty:ty),*) => {
        $(impl Integer for $ty {
            const SIGNED: bool = $signed;
        })*
    };
}

impl_integer!(false => u8, u16, u32, u64, u128, usize);
impl_integer!(true => i8, i16, i32, i64, i128, isize);

pub fn int<T>() -> Int<T>
where
    T: Integer,
{
    Int(PhantomData)
}

pub struct Int<T>(PhantomData<fn() -> T>);

impl<T> Parser<String, T> for Int<T>
where
    T: Integer,
{
    fn parse(&self, input: &mut String) -> Result<T, ParseError> {
        let bytes = input.as_bytes();
        let mut end = 0;
        if T::SIGNED && matches!(bytes.first(), Some(b'+' | b'-')) {
            end = 1;
        }
        while bytes.get(end).map_or(false, |b| b.is_ascii_digit()) {
            end += 1;
        }

        // zero digits, or a bare sign
        if end == 0 || !bytes[end - 1].is_ascii_digit() {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                "decimal digits",
                position_of(input),
            ));
        }

        let parsed = input[..end].parse::<T>();
        match parsed {
            Ok(value) => {
                input.drain(..end);
                Ok(value)
            }
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Err(ParseError::new(
                    ParseErrorKind::Overflow,
                    "an in-range integer",
                    position_of(input),
                )),
                _ => Err(ParseError::new(
                    ParseErrorKind::UnexpectedInput,
                    "decimal digits",
                    position_of(input),
                )),
            },
        }
    }
}

impl<T> Printer<String, T> for Int<T>
where
    T: Integer,
{
    fn print(&self, output: &T) -> Result<String, PrintError> {
        Ok(output.to_string())
    }
}

pub fn always<O>(value: O) -> Always<O>
where
    O: Clone,
{
    Always { value }
}

pub struct Always<O> {
    value: O,
}

impl<I, O> Parser<I, O> for Always<O>
where
    O: Clone,
{
    fn parse(&self, _input: &mut I) -> Result<O, ParseError> {
        Ok(self.value.clone())
    }
}

impl<I, O> Printer<I, O> for Always<O>
where
    I: Appendable,
    O: Clone + PartialEq,
{
    fn print(&self, output: &O) -> Result<I, PrintError> {
        if *output == self.value {
            Ok(I::empty())
        } else {
            Err(PrintError::UnprintableBranch)
        }
    }
}

pub fn end<I>() -> End<I>
where
    I: Consumable,
{
    End(PhantomData)
}

pub struct End<I>(PhantomData<fn() -> I>);

impl<I> Parser<I, ()> for End<I>
where
    I: Consumable,
{
    fn parse(&self, input: &mut I) -> Result<(), ParseError> {
        if input.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedInput,
                "end of input",
                Position::Remaining(input.len()),
            ))
        }
    }
}

impl<I> Printer<I, ()> for End<I>
where
    I: Consumable + Appendable,
{
    fn print(&self, _output: &()) -> Result<I, PrintError> {
        Ok(I::empty())
    }
}

pub struct Take<P, Q> {
    p: P,
    q: Q,
}

impl<P, Q> Take<P, Q> {
    pub(crate) fn new(p: P, q: Q) -> Self {
        Self { p, q }
    }
}

impl<I, A, B, P, Q> Parser<I, (A, B)> for Take<P, Q>
where
    I: Clone,
    P: Parser<I, A>,
    Q: Parser<I, B>,
{
    fn parse(&self, input: &mut I) -> Result<(A, B), ParseError> {
        let snapshot = input.clone();
        let a = self.p.parse(input)?;
        match self.q.parse(input) {
            Ok(b) => Ok((a, b)),
            Err(err) => {
                *input = snapshot;
                Err(err)
            }
        }
    }
}

impl<I, A, B, P, Q> Printer<I, (A, B)> for Take<P, Q>
where
    I: Clone + Appendable,
    P: Printer<I, A>,
    Q: Printer<I, B>,
{
    fn print(&self, output: &(A, B)) -> Result<I, PrintError> {
        let (a, b) = output;
        Ok(self.p.print(a)?.append(self.q.print(b)?))
    }
}

pub struct Skip<P, Q> {
    p: P,
    q: Q,
}

impl<P, Q> Skip<P, Q> {
    pub(crate) fn new(p: P, q: Q) -> Self {
        Self { p, q }
    }
}

impl<I, A, P, Q> Parser<I, A> for Skip<P, Q>
where
    I: Clone,
    P: Parser<I, A>,
    Q: Parser<I, ()>,
{
    fn parse(&self, input: &mut I) -> Result<A, ParseError> {
        let snapshot = input.clone();
        let a = self.p.parse(input)?;
        match self.q.parse(input) {
            Ok(()) => Ok(a),
            Err(err) => {
                *input = snapshot;
                Err(err)
            }
        }
    }
}

impl<I, A, P, Q> Printer<I, A> for Skip<P, Q>
where
    I: Clone + Appendable,
    P: Printer<I, A>,
    Q: Printer<I, ()>,
{
    fn print(&self, output: &A) -> Result<I, PrintError> {
        Ok(self.p.print(output)?.append(self.q.print(&())?))
    }
}

pub fn preceded<P, Q>(p: P, q: Q) -> Preceded<P, Q> {
    Preceded { p, q }
}

pub struct Preceded<P, Q> {
    p: P,
    q: Q,
}

impl<I, B, P, Q> Parser<I, B> for Preceded<P, Q>
where
    I: Clone,
    P: Parser<I, ()>,
    Q: Parser<I, B>,
{
    fn parse(&self, input: &mut I) -> Result<B, ParseError> {
        let snapshot = input.clone();
        self.p.parse(input)?;
        match self.q.parse(input) {
            Ok(b) => Ok(b),
            Err(err) => {
                *input = snapshot;
                Err(err)
            }
        }
    }
}

impl<I, B, P, Q> Printer<I, B> for Preceded<P, Q>
where
    I: Clone + Appendable,
    P: Printer<I, ()>,
    Q: Printer<I, B>,
{
    fn print(&self, output: &B) -> Result<I, PrintError> {
        Ok(self.p.print(&())?.append(self.q.print(output)?))
    }
}

pub struct OrElse<P, Q> {
    p: P,
    q: Q,
}

impl<P, Q> OrElse<P, Q> {
    pub(crate) fn new(p: P, q: Q) -> Self {
        Self { p, q }
    }
}

impl<I, O, P, Q> Parser<I, O> for OrElse<P, Q>
where
    P: Parser<I, O>,
    Q: Parser<I, O>,
{
    fn parse(&self, input: &mut I) -> Result<O, ParseError> {
        // a failed branch has already rolled the input back
        let from_p = match self.p.parse(input) {
            Ok(output) => return Ok(output),
            Err(err) => err,
        };
        match self.q.parse(input) {
            Ok(output) => Ok(output),
            Err(from_q) => Err(from_p.further(from_q)),
        }
    }
}

impl<I, O, P, Q> Printer<I, O> for OrElse<P, Q>
where
    I: Clone,
    O: PartialEq,
    P: Printer<I, O>,
    Q: Printer<I, O>,
{
    fn print(&self, output: &O) -> Result<I, PrintError> {
        if let Some(printed) = verified_print(self, &self.p, output) {
            return Ok(printed);
        }
        if let Some(printed) = verified_print(self, &self.q, output) {
            return Ok(printed);
        }
        Err(PrintError::RoundTripFailed)
    }
}

// A branch's printed input counts only if the whole alternation parses it
// back to the very value that was printed; an earlier branch may shadow
// the printed input.
fn verified_print<I, O, W, B>(whole: &W, branch: &B, output: &O) -> Option<I>
where
    I: Clone,
    O: PartialEq,
    W: Parser<I, O>,
    B: Printer<I, O>,
{
    let printed = branch.print(output).ok()?;
    let mut probe = printed.clone();
    match whole.parse(&mut probe) {
        Ok(reparsed) if reparsed == *output => Some(printed),
        _ => None,
    }
}

pub fn optional<P>(p: P) -> Optional<P> {
    Optional { p }
}

pub struct Optional<P> {
    p: P,
}

impl<I, O, P> Parser<I, Option<O>> for Optional<P>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &mut I) -> Result<Option<O>, ParseError> {
        match self.p.parse(input) {
            Ok(output) => Ok(Some(output)),
            Err(_) => Ok(None),
        }
    }
}

impl<I, O, P> Printer<I, Option<O>> for Optional<P>
where
    I: Appendable,
    P: Printer<I, O>,
{
    fn print(&self, output: &Option<O>) -> Result<I, PrintError> {
        match output {
            Some(inner) => self.p.print(inner),
            None => Ok(I::empty()),
        }
    }
}

pub fn either<P, Q>(p: P, q: Q) -> EitherOf<P, Q> {
    EitherOf { p, q }
}

pub struct EitherOf<P, Q> {
    p: P,
    q: Q,
}

impl<I, A, B, P, Q> Parser<I, Either<A, B>> for EitherOf<P, Q>
where
    P: Parser<I, A>,
    Q: Parser<I, B>,
{
    fn parse(&self, input: &mut I) -> Result<Either<A, B>, ParseError> {
        let from_p = match self.p.parse(input) {
            Ok(a) => return Ok(Either::Left(a)),
            Err(err) => err,
        };
        match self.q.parse(input) {
            Ok(b) => Ok(Either::Right(b)),
            Err(from_q) => Err(from_p.further(from_q)),
        }
    }
}

impl<I, A, B, P, Q> Printer<I, Either<A, B>> for EitherOf<P, Q>
where
    P: Printer<I, A>,
    Q: Printer<I, B>,
{
    fn print(&self, output: &Either<A, B>) -> Result<I, PrintError> {
        match output {
            Either::Left(a) => self.p.print(a),
            Either::Right(b) => self.q.print(b),
        }
    }
}

pub fn seq<G>(group: G) -> Seq<G> {
    Seq(group)
}

pub struct Seq<G>(G);

macro_rules! impl_seq {
    ($({$idx:tt: $p:ident, $out:ident: $o:ident}),*) => {
        impl<In, $($o,)* $($p,)*> Parser<In, ($($o,)*)> for Seq<($($p,)*)>
        where
            In: Clone,
            $($p: Parser<In, $o>,)*
        {
            fn parse(&self, input: &mut In) -> Result<($($o,)*), ParseError> {
                let snapshot = input.clone();
                let result: Result<($($o,)*), ParseError> = (|| {
                    $(let $out = self.0.$idx.parse(input)?;)*
                    Ok(($($out,)*))
                })();
                if result.is_err() {
                    *input = snapshot;
                }
                result
            }
        }

        impl<In, $($o,)* $($p,)*> Printer<In, ($($o,)*)> for Seq<($($p,)*)>
        where
            In: Clone + Appendable,
            $($p: Printer<In, $o>,)*
        {
            fn print(&self, output: &($($o,)*)) -> Result<In, PrintError> {
                let ($($out,)*) = output;
                let mut printed = In::empty();
                $(printed = printed.append(self.0.$idx.print($out)?);)*
                Ok(printed)
            }
        }
    };
}

impl_seq!({0: T0, out0: Out0}, {1: T1, out1: Out1}, {2: T2, out2: Out2}, {3: T3, out3: Out3}, {4: T4, out4: Out4}, {5: T5, out5: Out5});
impl_seq!({0: T0, out0: Out0}, {1: T1, out1: Out1}, {2: T2, out2: Out2}, {3: T3, out3: Out3}, {4: T4, out4: Out4});
impl_seq!({0: T0, out0: Out0}, {1: T1, out1: Out1}, {2: T2, out2: Out2}, {3: T3, out3: Out3});
impl_seq!({0: T0, out0: Out0}, {1: T1, out1: Out1}, {2: T2, out2: Out2});
impl_seq!({0: T0, out0: Out0}, {1: T1, out1: Out1});
impl_seq!({0: T0, out0: Out0});
