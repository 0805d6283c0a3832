use lx_core::ast::NodeKind;
use lx_core::span::Span;
use lx_core::{Error, Result};
use lx_lang::{read, read_one, ReaderSession};
use pretty_assertions::assert_eq;

#[test]
fn reads_nested_forms() -> Result<()> {
    let node = read_one("(f 1 [a \"b\"] '(g) #(+ $0 1))")?;
    assert_eq!(node.to_string(), "(f 1 [a \"b\"] '(g) #(+ $0 1))");
    Ok(())
}

#[test]
fn numbers_and_identifiers_are_distinguished() -> Result<()> {
    let forms = read("12 -3 0xFF 1.5F - -x $0")?;
    let kinds: Vec<&str> = forms
        .iter()
        .map(|node| match node.kind() {
            NodeKind::Number(_) => "number",
            NodeKind::Identifier(_) => "identifier",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["number", "number", "number", "number", "identifier", "identifier", "identifier"]
    );
    Ok(())
}

#[test]
fn comments_and_commas_are_skipped() -> Result<()> {
    let forms = read("; header\n(a, b) ; trailing\n")?;
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].to_string(), "(a b)");
    Ok(())
}

#[test]
fn string_escapes() -> Result<()> {
    let node = read_one(r#""tab\there""#)?;
    assert!(matches!(node.kind(), NodeKind::Text(text) if text == "tab\there"));
    Ok(())
}

#[test]
fn spans_cover_forms() -> Result<()> {
    let forms = read("  (a b)")?;
    assert_eq!(forms[0].span(), Span::new(0, 2, 7));
    let inner = forms[0].as_list().map(|items| items[1].span());
    assert_eq!(inner, Some(Span::new(0, 5, 6)));
    Ok(())
}

#[test]
fn unterminated_list_reports_position() {
    let err = read("(a (b c)").unwrap_err();
    match err {
        Error::Syntax { message, at } => {
            assert!(message.contains("unterminated list"), "{}", message);
            assert_eq!(at.0.map(|span| span.lo), Some(8));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn mismatched_delimiters_fail() {
    assert!(read("(a]").is_err());
    assert!(read(")").is_err());
}

#[test]
fn sessions_remember_the_last_form() -> Result<()> {
    let mut session = ReaderSession::new(3);
    let forms = session.read_all("(a) (b)")?;
    assert_eq!(forms.len(), 2);
    assert_eq!(session.last_read().map(|n| n.to_string()), Some("(b)".to_string()));
    assert_eq!(forms[1].span().file, 3);
    Ok(())
}

#[test]
fn read_one_rejects_many() {
    assert!(read_one("a b").is_err());
}
