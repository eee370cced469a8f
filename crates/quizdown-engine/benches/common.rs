// Bench helpers; each bench file only uses some of them
#[allow(dead_code)]
pub fn generate_questionnaire(pages: usize, questions_per_page: usize) -> String {
    let mut xml = String::from("<questionnaire>\n");
    for page in 0..pages {
        let submit = page + 1 == pages;
        xml.push_str(&format!(
            "<page id=\"p{page}\" title=\"Page {page}\" submit=\"{submit}\">\n<section>\n"
        ));
        xml.push_str("<markdown width=\"30\">\n## Intro\n\nSome **context** for this page.\n</markdown>\n<questions>\n");
        for q in 0..questions_per_page {
            xml.push_str(&format!(
                "<question type=\"choices\" required=\"true\"><text>Question {q}</text>\
                 <choice value=\"a\">A</choice><choice value=\"b\">B</choice><choice>C</choice></question>\n"
            ));
        }
        xml.push_str("</questions>\n</section>\n</page>\n");
    }
    xml.push_str("</questionnaire>\n");
    xml
}

#[allow(dead_code)]
pub fn generate_rich_html(size: usize) -> String {
    let base = "<h2>Heading</h2><p>Text with <strong>bold</strong>, <em>italic</em> and a \
                <a href=\"https://example.com\">link</a>.</p><ul><li><p>one</p></li><li>two</li></ul>\
                <table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>\
                <blockquote>quoted\nlines</blockquote><pre><code>let x = 1 &lt; 2;</code></pre>";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_block_json(size: usize) -> String {
    let block = r#"{"type":"header","data":{"level":2,"text":"Title"}},
        {"type":"paragraph","data":{"text":"Para with <a href=\"/x\">link</a><br>and break"}},
        {"type":"list","data":{"style":"ordered","items":["a",{"content":"b","items":["c"]}]}},
        {"type":"quote","data":{"text":"Quote","caption":"Someone"}}"#;
    let blocks = vec![block; size].join(",");
    format!(r#"{{"time":1700000000000,"blocks":[{blocks}],"version":"2.28.0"}}"#)
}
