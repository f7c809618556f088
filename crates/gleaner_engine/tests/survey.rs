use gleaner_engine::survey_document;
use pretty_assertions::assert_eq;

#[test]
fn counts_match_tag_totals_regardless_of_nesting() {
    let html = r#"
        <html><body>
            <a href="/one"><img src="nested.png"></a>
            <div><div><img src="deep.jpg"></div></div>
            <img src="top.gif">
            <a href="/two">plain</a>
        </body></html>
    "#;
    let survey = survey_document(html);
    assert_eq!(survey.images.len(), 3);
    assert_eq!(survey.anchor_count, 2);
}

#[test]
fn images_keep_document_order_and_raw_sources() {
    let html = r#"<img src="first.png"><img src="/second.jpg"><img src="http://cdn.test/third.gif">"#;
    let survey = survey_document(html);
    let sources: Vec<_> = survey
        .images
        .iter()
        .map(|image| image.src.as_deref())
        .collect();
    assert_eq!(
        sources,
        vec![
            Some("first.png"),
            Some("/second.jpg"),
            Some("http://cdn.test/third.gif"),
        ]
    );
}

#[test]
fn missing_and_blank_sources_keep_their_positions() {
    let html = r#"<img><img src="   "><img src="real.png">"#;
    let survey = survey_document(html);
    assert_eq!(survey.images.len(), 3);
    assert_eq!(survey.images[0].src, None);
    assert_eq!(survey.images[1].src, None);
    assert_eq!(survey.images[2].src.as_deref(), Some("real.png"));
}

#[test]
fn duplicate_sources_are_counted_every_time() {
    let html = r#"<img src="same.png"><img src="same.png"><a href="x"></a><a href="x"></a>"#;
    let survey = survey_document(html);
    assert_eq!(survey.images.len(), 2);
    assert_eq!(survey.anchor_count, 2);
}

#[test]
fn anchors_without_href_still_count() {
    let survey = survey_document("<a>one</a><a name=\"x\">two</a>");
    assert_eq!(survey.anchor_count, 2);
}

#[test]
fn broken_markup_is_surveyed_with_what_the_parser_recovers() {
    let html = r#"<body><img src="a.png"><a href="/x">unclosed<img src="b.png">"#;
    let survey = survey_document(html);
    assert_eq!(survey.images.len(), 2);
    assert_eq!(survey.anchor_count, 1);
}

#[test]
fn upper_case_tags_are_recognized() {
    let survey = survey_document(r#"<IMG SRC="shout.png"><A HREF="/x">x</A>"#);
    assert_eq!(survey.images.len(), 1);
    assert_eq!(survey.images[0].src.as_deref(), Some("shout.png"));
    assert_eq!(survey.anchor_count, 1);
}

#[test]
fn empty_document_surveys_to_zero() {
    let survey = survey_document("");
    assert_eq!(survey.images.len(), 0);
    assert_eq!(survey.anchor_count, 0);
}
