use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Label, Report, ReportKind, Source};
use polyroll::{
	notation::{self, validate_notation},
	parse,
	roll::{roll, Describe},
};

/// Maximum number of individual dice listed per pool before the rest are summarised
const LIST_LIMIT: usize = 20;

fn main() -> ExitCode {
	let args = env::args();
	let input = if args.len() > 1 {
		// Combine all args passed to the executable so the notation can be left unquoted even with spaces.
		// The first argument is skipped since it's typically the name of the executable itself.
		args.skip(1).collect::<Vec<String>>().join(" ")
	} else {
		match read_line() {
			Ok(line) => line,
			Err(err) => {
				eprintln!("Unable to read notation from stdin: {err}");
				return ExitCode::FAILURE;
			}
		}
	};

	let validated = match validate_notation(&input) {
		Ok(validated) => validated,
		Err(notation::Error::Parse(err)) => {
			report_parse_error(&err);
			return ExitCode::FAILURE;
		}
		Err(err) => {
			eprintln!("Error: {err}");
			return ExitCode::FAILURE;
		}
	};

	match roll([validated.notation.as_str()]) {
		Ok(rolled) => {
			println!("Total: {}", rolled.total);
			println!("Rolls: {}", rolled.describe(Some(LIST_LIMIT)));
			println!("Description:");
			for (canonical, lines) in validated.canonical.iter().zip(&validated.description) {
				println!("  {canonical}");
				for line in lines {
					println!("    {line}");
				}
			}
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("Error: {err}");
			ExitCode::FAILURE
		}
	}
}

/// Reads the first line of stdin, prompting for it when nothing has been piped in.
fn read_line() -> io::Result<String> {
	let mut lines = io::stdin().lines();

	if lines.size_hint().1.is_none() {
		print!("Enter dice notation: ");
		io::stdout().flush()?;
	}

	lines.next().unwrap_or_else(|| Ok(String::new()))
}

/// Prints a labelled report pointing at the part of the notation that failed to parse.
fn report_parse_error(err: &parse::Error) {
	let mut report = Report::build(ReportKind::Error, ("notation", err.span.clone()))
		.with_message("invalid dice notation")
		.with_label(Label::new(("notation", err.span.clone())).with_message(&err.reason));
	if let Some(suggestion) = &err.suggestion {
		report = report.with_help(format!("did you mean \"{suggestion}\"?"));
	}

	if report
		.finish()
		.eprint(("notation", Source::from(&err.input)))
		.is_err()
	{
		eprintln!("Error: {err}");
	}
}
