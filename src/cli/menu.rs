//! Interactive feature menu and input parsing.

use std::io::{BufRead, Write};

use repopulse::features::catalogue;
use repopulse::{Feature, InsightError, RepositorySlug};

/// Parses a menu selection such as `"3"`.
///
/// # Errors
///
/// Returns [`InsightError::InvalidFeature`] unless the trimmed input is a
/// catalogued feature number.
pub fn parse_feature_choice(input: &str) -> Result<Feature, InsightError> {
    let trimmed = input.trim();
    trimmed
        .parse::<u8>()
        .ok()
        .and_then(Feature::from_id)
        .ok_or_else(|| InsightError::InvalidFeature {
            input: trimmed.to_owned(),
        })
}

/// Parses an `owner/repo` answer.
///
/// # Errors
///
/// Returns [`InsightError::InvalidRepository`] for anything else.
pub fn parse_repository(input: &str) -> Result<RepositorySlug, InsightError> {
    RepositorySlug::parse(input.trim())
}

/// Writes the numbered feature list.
///
/// # Errors
///
/// Returns [`InsightError::Io`] when writing fails.
pub fn write_menu<W: Write>(out: &mut W) -> Result<(), InsightError> {
    let io_error = |error: std::io::Error| InsightError::io(&error);
    writeln!(out, "\nAvailable features:").map_err(io_error)?;
    for entry in catalogue() {
        writeln!(out, "  {}. {} - {}", entry.id, entry.name, entry.description)
            .map_err(io_error)?;
    }
    Ok(())
}

/// Writes `prompt` and reads one line of input.
///
/// # Errors
///
/// Returns [`InsightError::Io`] when the terminal cannot be read, or when
/// input ends before a line arrives.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<String, InsightError> {
    let io_error = |error: std::io::Error| InsightError::io(&error);
    write!(out, "{prompt}").map_err(io_error)?;
    out.flush().map_err(io_error)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(io_error)?;
    if read == 0 {
        return Err(InsightError::Io {
            message: "input closed before an answer was given".to_owned(),
        });
    }
    Ok(line.trim().to_owned())
}

/// Shows the menu and asks for a feature.
///
/// # Errors
///
/// Returns [`InsightError::InvalidFeature`] for an unknown selection, or
/// [`InsightError::Io`] when the terminal fails.
pub fn choose_feature<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Feature, InsightError> {
    write_menu(out)?;
    let answer = prompt_line(input, out, "\nChoose a feature (1-8): ")?;
    parse_feature_choice(&answer)
}

/// Asks for the repository to analyse.
///
/// # Errors
///
/// Returns [`InsightError::InvalidRepository`] for a malformed answer, or
/// [`InsightError::Io`] when the terminal fails.
pub fn choose_repository<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<RepositorySlug, InsightError> {
    let answer = prompt_line(input, out, "Enter the GitHub repository (owner/repo): ")?;
    parse_repository(&answer)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", Feature::CodeReview)]
    #[case(" 6\n", Feature::History)]
    #[case("8", Feature::Activity)]
    fn feature_choices_parse(#[case] input: &str, #[case] expected: Feature) {
        assert_eq!(parse_feature_choice(input).ok(), Some(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("9")]
    #[case("")]
    #[case("two")]
    fn unknown_choices_are_rejected(#[case] input: &str) {
        assert!(matches!(
            parse_feature_choice(input),
            Err(InsightError::InvalidFeature { .. })
        ));
    }

    #[rstest]
    fn repository_answers_are_trimmed() {
        let slug = parse_repository("  octocat/hello-world \n").expect("slug should parse");

        assert_eq!(slug.to_string(), "octocat/hello-world");
    }

    #[rstest]
    #[case("octocat")]
    #[case("octocat/")]
    #[case("a/b/c")]
    fn malformed_repositories_are_rejected(#[case] input: &str) {
        assert!(matches!(
            parse_repository(input),
            Err(InsightError::InvalidRepository { .. })
        ));
    }

    #[rstest]
    fn menu_lists_every_feature() {
        let mut out = Vec::new();

        write_menu(&mut out).expect("menu should render");

        let text = String::from_utf8(out).expect("menu should be UTF-8");
        assert!(text.contains("  1. Smart Code Reviewer - Analyzes most recent PR"));
        assert!(text.contains("  8. Activity Notifier"));
    }

    #[rstest]
    fn choose_feature_reads_one_answer() {
        let mut input = Cursor::new("7\n");
        let mut out = Vec::new();

        let feature = choose_feature(&mut input, &mut out).expect("choice should parse");

        assert_eq!(feature, Feature::Onboarding);
        let text = String::from_utf8(out).expect("prompt should be UTF-8");
        assert!(text.ends_with("Choose a feature (1-8): "));
    }

    #[rstest]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        let result = choose_repository(&mut input, &mut out);

        assert!(matches!(result, Err(InsightError::Io { .. })));
    }
}
