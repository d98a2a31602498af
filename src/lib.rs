// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

pub mod config;
pub mod notation;
pub mod note;
pub mod output;
pub mod pattern;
pub mod player;
pub mod render;
pub mod synth;
pub mod wave;
