//! Raw bindings to the legacy (0.x, synchronous) libfprint API, generated by
//! bindgen at build time from the headers found through pkg-config.
#![warn(clippy::all)]

mod bindings {
    #![allow(
        non_upper_case_globals,
        non_camel_case_types,
        non_snake_case,
        dead_code,
        clippy::unreadable_literal,
        clippy::upper_case_acronyms
    )]
    include!(concat!(env!("OUT_DIR"), "/fprint.rs"));
}

pub use bindings::*;
