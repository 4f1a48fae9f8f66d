//! Play-through scenarios against the demo adventure

mod harness;
mod scenarios;
