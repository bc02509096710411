#![feature(test)]

extern crate test;

use chumsky::Parser;
use polyroll::{dice::RollOptions, notation::DiceNotation, parse};
use test::Bencher;

const ABSURD_NOTATION: &str = "100d42C{>40,<3}R{<6}2V{1=2,>37=40}!H20L10D{7,>39}+12-3*2**3";

#[bench]
fn parse_basic(b: &mut Bencher) {
	b.iter(|| parse::parse("4d8+4").unwrap());
}

#[bench]
fn parse_multiple_terms(b: &mut Bencher) {
	b.iter(|| parse::parse("1d20 + 2d6L - 1d8! + 4d{a,b,c}").unwrap());
}

#[bench]
fn parse_absurd(b: &mut Bencher) {
	b.iter(|| parse::parse(ABSURD_NOTATION).unwrap());
}

#[bench]
fn parser_creation(b: &mut Bencher) {
	b.iter(parse::notation);
}

#[bench]
fn parse_with_reused_parser(b: &mut Bencher) {
	let parser = parse::notation();
	b.iter(|| parser.parse(ABSURD_NOTATION).into_result().unwrap());
}

#[bench]
fn fromstr_basic(b: &mut Bencher) {
	b.iter(|| "4d8+4".parse::<RollOptions>().unwrap());
}

#[bench]
fn fromstr_absurd(b: &mut Bencher) {
	b.iter(|| ABSURD_NOTATION.parse::<RollOptions>().unwrap());
}

#[bench]
fn suggest_typo(b: &mut Bencher) {
	b.iter(|| parse::parse("4 d 6 + d8").unwrap_err());
}

#[bench]
fn dice_notation_new(b: &mut Bencher) {
	b.iter(|| DiceNotation::new("  1d20 + 2d6L  ").unwrap());
}
