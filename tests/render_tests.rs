use mdlite_lib::{HtmlRenderer, SymbolTable, render_to_html};
use pretty_assertions::assert_eq;

#[test]
fn test_empty_input() {
    assert_eq!(render_to_html(""), "");
}

#[test]
fn test_plain_text_only_substitutes_newlines() {
    assert_eq!(render_to_html("Hello, world!"), "Hello, world!");
    assert_eq!(render_to_html("one\ntwo\n\nthree"), "one<br>two<br><br>three");
    assert_eq!(render_to_html("<p>kept as is</p>"), "<p>kept as is</p>");
}

#[test]
fn test_escapes() {
    assert_eq!(render_to_html("\\_"), "_");
    assert_eq!(render_to_html("\\\\"), "\\");
    assert_eq!(render_to_html("\\_not italic\\_"), "_not italic_");
    assert_eq!(render_to_html("\\__not bold\\__"), "__not bold__");
}

#[test]
fn test_escaped_newline_is_still_a_break() {
    assert_eq!(render_to_html("a\\\nb"), "a<br>b");
}

#[test]
fn test_trailing_backslash() {
    assert_eq!(render_to_html("end\\"), "end");
    assert_eq!(render_to_html("_end\\"), "_end");
}

#[test]
fn test_single_underscore() {
    assert_eq!(render_to_html("_"), "_");
}

#[test]
fn test_unterminated_double_underscore_is_not_duplicated() {
    assert_eq!(render_to_html("__"), "__");
    assert_eq!(render_to_html("a __"), "a __");
    assert_eq!(render_to_html("____"), "____");
}

#[test]
fn test_basic_emphasis() {
    assert_eq!(render_to_html("a _b_ c"), "a <em>b</em> c");
    assert_eq!(render_to_html("a __b__ c"), "a <strong>b</strong> c");
    assert_eq!(render_to_html("_whole line_"), "<em>whole line</em>");
}

#[test]
fn test_triple_underscore() {
    assert_eq!(render_to_html("___a___"), "<strong><em>a</em></strong>");
}

#[test]
fn test_triple_underscore_unterminated() {
    assert_eq!(render_to_html("___a"), "___a");
}

#[test]
fn test_word_boundary() {
    assert_eq!(render_to_html("a_b_c"), "a_b_c");
    assert_eq!(render_to_html("_a_b"), "_a_b");
}

#[test]
fn test_underscore_is_a_boundary_for_the_next_field() {
    assert_eq!(render_to_html("a__b__c"), "a_<em>b</em>_c");
}

#[test]
fn test_italic_closer_followed_by_underscores() {
    assert_eq!(render_to_html("_a__"), "<em>a</em>_");
    assert_eq!(render_to_html("_a___"), "<em>a</em>__");
    assert_eq!(render_to_html("_foo__ bar"), "<em>foo</em>_ bar");
    assert_eq!(render_to_html("_a__b_"), "<em>a</em><em>b</em>");
}

#[test]
fn test_digits_keep_delimiters() {
    assert_eq!(render_to_html("_14_"), "_14_");
    assert_eq!(render_to_html("__14__"), "__14__");
    assert_eq!(render_to_html("___14___"), "<strong>_14_</strong>");
    assert_eq!(render_to_html("_1.5_"), "<em>1.5</em>");
}

#[test]
fn test_no_bold_inside_italic() {
    let html = render_to_html("_a __b__ c_");
    assert!(!html.contains("<strong>"), "bold opened inside italic: {html}");
    assert_eq!(html, "<em>a __b__ c</em>");
}

#[test]
fn test_italic_inside_bold() {
    assert_eq!(
        render_to_html("__bold _italic_ bold__"),
        "<strong>bold <em>italic</em> bold</strong>"
    );
}

#[test]
fn test_unterminated_italic_inside_bold() {
    assert_eq!(render_to_html("__a _b c"), "__a _b c");
    assert_eq!(render_to_html("__a _b c__"), "<strong>a _b c</strong>");
}

#[test]
fn test_whitespace_rules() {
    assert_eq!(render_to_html("_ a_"), "_ a_");
    assert_eq!(render_to_html("_a _"), "_a _");
    assert_eq!(render_to_html("__ a__"), "__ a__");
    assert_eq!(render_to_html("_a_\tb"), "<em>a</em>\tb");
}

#[test]
fn test_unterminated_field_keeps_rendered_content() {
    assert_eq!(render_to_html("_a\nb"), "_a<br>b");
    assert_eq!(render_to_html("__a\\_b"), "__a_b");
}

#[test]
fn test_unicode_content() {
    assert_eq!(render_to_html("_привет_ мир"), "<em>привет</em> мир");
    assert_eq!(render_to_html("__你好__"), "<strong>你好</strong>");
    assert_eq!(render_to_html("a 👋_b_"), "a 👋_b_");
}

#[test]
fn test_custom_symbol_table() {
    let symbols = SymbolTable::default().with_entry('<', "&lt;").with_entry('>', "&gt;");
    let renderer = HtmlRenderer::with_symbols(symbols);
    assert_eq!(renderer.render("_<tag>_\n"), "<em>&lt;tag&gt;</em><br>");
}

#[test]
fn test_shared_renderer_across_threads() {
    let renderer = HtmlRenderer::new();
    let inputs: Vec<String> = (0..16).map(|i| format!("item {i}: _x{i}_ and __y{i}__\n")).collect();

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(|| renderer.render(input)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, output) in outputs.iter().enumerate() {
        assert_eq!(output, &format!("item {i}: <em>x{i}</em> and <strong>y{i}</strong><br>"));
    }
}
