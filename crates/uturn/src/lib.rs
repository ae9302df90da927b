#![deny(rust_2018_idioms)]

mod parsers;

pub mod request;
pub mod url;

pub use self::{
    parsers::{
        body, json, method, path_component, path_end, path_literal, query_item, Body, Json, Method,
        PathComponent, PathEnd, QueryItem,
    },
    request::{MethodSlot, Request},
};

#[doc(inline)]
pub use uturn_core::*;
