mod day01;
mod day02;
mod day03;
mod day04;
mod day05;
mod day07;
mod day08;
mod day09;
mod day10;
mod day11;
mod day12;

pub use day01::day1;
pub use day02::{day2, DAY2_VARIANTS};
pub use day03::day3;
pub use day04::day4;
pub use day05::day5;
pub use day07::{day7, DAY7_VARIANTS};
pub use day08::day8;
pub use day09::day9;
pub use day10::day10;
pub use day11::day11;
pub use day12::day12;
