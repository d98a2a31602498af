// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The textual notation for buzzer patterns.

pub mod compiler;
pub mod error;
pub mod line_map;

pub use compiler::{compile, compile_with, count_keyframes};
pub use error::{ParseError, ParseErrorKind};
