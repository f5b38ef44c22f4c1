use super::CommandError;

/// A manual TLE ready to send: every field is non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTle {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl ManualTle {
    /// Builds a manual TLE from a pasted block and an optional name field.
    ///
    /// The block holds two element lines, optionally preceded by a name line.
    /// A non-blank `name` wins over the block's own name line.
    pub fn from_block(name: Option<&str>, block: &str) -> Result<Self, CommandError> {
        let (block_name, line1, line2) = parse_tle_lines(block)?;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .or(block_name);

        Self::new(name.as_deref().unwrap_or(""), &line1, &line2)
    }

    pub fn new(name: &str, line1: &str, line2: &str) -> Result<Self, CommandError> {
        let (name, line1, line2) = (name.trim(), line1.trim(), line2.trim());
        if name.is_empty() {
            return Err(CommandError::validation("satellite name is required"));
        }
        if line1.is_empty() || line2.is_empty() {
            return Err(CommandError::validation("both TLE lines are required"));
        }

        Ok(Self {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }
}

fn parse_tle_lines(block: &str) -> Result<(Option<String>, String, String), CommandError> {
    let lines: Vec<String> = block
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.len() {
        2 => Ok((None, lines[0].clone(), lines[1].clone())),
        3 => Ok((Some(lines[0].clone()), lines[1].clone(), lines[2].clone())),
        n => Err(CommandError::validation(format!(
            "expected 2 or 3 non-blank TLE lines, got {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9005";
    const LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579999999";

    #[test]
    fn two_line_block_takes_name_argument() {
        let block = format!("\n  {LINE1}  \n\n{LINE2}\n");
        let tle = ManualTle::from_block(Some(" ISS "), &block).unwrap();

        assert_eq!(tle.name, "ISS");
        assert_eq!(tle.line1, LINE1);
        assert_eq!(tle.line2, LINE2);
    }

    #[test]
    fn three_line_block_supplies_name() {
        let block = format!("ISS (ZARYA)\n{LINE1}\n{LINE2}");
        let tle = ManualTle::from_block(None, &block).unwrap();
        assert_eq!(tle.name, "ISS (ZARYA)");
    }

    #[test]
    fn explicit_name_wins_over_block_name() {
        let block = format!("ISS (ZARYA)\n{LINE1}\n{LINE2}");
        let tle = ManualTle::from_block(Some("MY-ISS"), &block).unwrap();
        assert_eq!(tle.name, "MY-ISS");
    }

    #[test]
    fn blank_name_argument_falls_back_to_block_name() {
        let block = format!("ISS (ZARYA)\n{LINE1}\n{LINE2}");
        let tle = ManualTle::from_block(Some("   "), &block).unwrap();
        assert_eq!(tle.name, "ISS (ZARYA)");
    }

    #[test]
    fn single_line_block_is_rejected() {
        let err = ManualTle::from_block(Some("ISS"), LINE1).unwrap_err();
        assert!(matches!(err, CommandError::Validation(_)));
    }

    #[test]
    fn too_many_lines_are_rejected() {
        let block = format!("A\nB\n{LINE1}\n{LINE2}");
        assert!(ManualTle::from_block(None, &block).is_err());
    }

    #[test]
    fn missing_name_is_rejected() {
        let block = format!("{LINE1}\n{LINE2}");
        assert_eq!(
            ManualTle::from_block(Some(""), &block).unwrap_err(),
            CommandError::validation("satellite name is required")
        );
    }

    #[test]
    fn whitespace_only_lines_are_rejected() {
        assert!(ManualTle::new("ISS", "   ", LINE2).is_err());
        assert!(ManualTle::new("ISS", LINE1, "\t").is_err());
    }
}
