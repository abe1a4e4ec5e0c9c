//! Parsing of `--set PAGE:ID=TEXT` arguments

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSpec {
    pub page: usize,
    pub id: usize,
    pub text: String,
}

/// Parse `PAGE:ID=TEXT`. Only the first `=` separates; the text may contain more.
pub fn parse_edit(input: &str) -> Result<EditSpec, String> {
    let (target, text) = input
        .split_once('=')
        .ok_or_else(|| format!("Expected PAGE:ID=TEXT, got '{}'", input))?;

    let (page, id) = target
        .split_once(':')
        .ok_or_else(|| format!("Expected PAGE:ID before '=', got '{}'", target))?;

    let page: usize = page
        .trim()
        .parse()
        .map_err(|_| format!("Invalid page: {}", page))?;
    let id: usize = id
        .trim()
        .parse()
        .map_err(|_| format!("Invalid region id: {}", id))?;

    Ok(EditSpec {
        page,
        id,
        text: text.to_string(),
    })
}
