//! End-to-end tests driving a whole session line by line.

mod helpers;
mod test_duplicates;
mod test_invalid_input;
mod test_random_fill;
mod test_redraw;
mod test_reset;
mod test_scenarios;
