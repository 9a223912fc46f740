use folio_engine::editor::{CodeNode, ImageNode, ListItemNode, ListNode};
use folio_engine::portable_text::{Block, BlockStyle, HeadingLevel, ListKind, PortableText};
use folio_engine::{
    DecodeWarning, EditorDocument, EditorNode, InlineNode, TextFormat, decode, encode,
};
use pretty_assertions::assert_eq;

mod common;
use common::shape;

fn roundtrip(value: &PortableText) -> PortableText {
    let json = value.to_json().unwrap();
    let decoded = decode(&json).unwrap();
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    encode(&decoded.document)
}

#[test]
fn plain_text_survives_a_cycle() {
    let doc = EditorDocument::new(vec![
        EditorNode::paragraph(vec![InlineNode::text("First paragraph.")]),
        EditorNode::paragraph(vec![InlineNode::text("Second paragraph.")]),
    ]);

    let json = encode(&doc).to_json().unwrap();
    let decoded = decode(&json).unwrap().document;

    assert_eq!(decoded.text_content(), doc.text_content());
    assert_eq!(decoded, doc);
}

#[test]
fn bold_and_italic_marks_survive_two_cycles() {
    let json = r#"[{
        "_type": "block", "_key": "b1", "style": "normal", "markDefs": [],
        "children": [{"_type": "span", "_key": "s1", "text": "both", "marks": ["strong", "em"]}]
    }]"#;

    let first = encode(&decode(json).unwrap().document);
    let second = roundtrip(&first);

    let span = &second.blocks[0].as_text().unwrap().children[0];
    assert!(span.has_mark("strong"));
    assert!(span.has_mark("em"));
    assert_eq!(shape(&second), vec!["normal: both{em,strong}"]);
}

#[test]
fn link_with_mixed_formatting_keeps_runs_and_shared_key() {
    let json = r#"[{
        "_type": "block", "_key": "b1", "style": "normal",
        "markDefs": [{"_type": "link", "_key": "l1", "href": "https://example.com"}],
        "children": [
            {"_type": "span", "_key": "s1", "text": "Visit ", "marks": []},
            {"_type": "span", "_key": "s2", "text": "bold", "marks": ["strong", "l1"]},
            {"_type": "span", "_key": "s3", "text": "italic", "marks": ["em", "l1"]},
            {"_type": "span", "_key": "s4", "text": " site", "marks": ["l1"]}
        ]
    }]"#;

    let encoded = encode(&decode(json).unwrap().document);
    let block = encoded.blocks[0].as_text().unwrap();

    assert_eq!(
        shape(&encoded),
        vec![
            "normal: Visit {} | bold{strong}->https://example.com | italic{em}->https://example.com |  site{}->https://example.com"
        ]
    );
    assert_eq!(block.mark_defs.len(), 1);
    let link_key = block.mark_defs[0].key();
    assert!(link_key.starts_with("link-"));
    assert!(block.children[1..].iter().all(|span| span.has_mark(link_key)));

    assert_eq!(shape(&roundtrip(&encoded)), shape(&encoded));
}

#[test]
fn images_survive_a_cycle() {
    let doc = EditorDocument::new(vec![EditorNode::Image(ImageNode::new(
        "https://cdn.example.com/cat.png",
        "A sleeping cat",
    ))]);

    let encoded = encode(&doc);
    assert_eq!(
        shape(&encoded),
        vec!["image https://cdn.example.com/cat.png alt=A sleeping cat"]
    );
    assert_eq!(shape(&roundtrip(&encoded)), shape(&encoded));
}

#[test]
fn empty_input_normalizes_to_one_empty_block() {
    let encoded = encode(&EditorDocument::default());
    assert_eq!(encoded.len(), 1);
    let block = encoded.blocks[0].as_text().unwrap();
    assert_eq!(block.children.len(), 1);
    assert_eq!(block.children[0].text, "");

    let decoded = decode("[]").unwrap();
    assert!(decoded.document.is_empty());
    assert_eq!(shape(&encode(&decoded.document)), vec!["normal: {}"]);
}

#[test]
fn empty_paragraph_keeps_its_style() {
    let doc = EditorDocument::new(vec![EditorNode::Quote(vec![])]);
    assert_eq!(shape(&encode(&doc)), vec!["blockquote: {}"]);
}

#[test]
fn malformed_image_is_skipped_and_text_survives() {
    let json = r#"[
        {"_type": "image", "_key": "i1", "alt": "broken"},
        {"_type": "block", "_key": "b1", "style": "normal", "markDefs": [],
         "children": [{"_type": "span", "_key": "s1", "text": "Still here", "marks": []}]}
    ]"#;

    let decoded = decode(json).unwrap();

    assert_eq!(
        decoded.document.children,
        vec![EditorNode::paragraph(vec![InlineNode::text("Still here")])]
    );
    assert_eq!(decoded.warnings.len(), 1);
}

#[test]
fn text_image_text_encodes_to_three_blocks_in_order() {
    let doc = EditorDocument::new(vec![EditorNode::paragraph(vec![
        InlineNode::text("Before"),
        InlineNode::Image(ImageNode::new("/inline.png", "inline")),
        InlineNode::text("After"),
    ])]);

    let encoded = encode(&doc);
    let types: Vec<&str> = encoded.iter().map(Block::type_name).collect();

    assert_eq!(types, vec!["block", "image", "block"]);
    assert_eq!(
        shape(&encoded),
        vec![
            "normal: Before{}",
            "image /inline.png alt=inline",
            "normal: After{}"
        ]
    );
}

#[test]
fn link_without_text_is_dropped() {
    let doc = EditorDocument::new(vec![EditorNode::paragraph(vec![
        InlineNode::text("Hi"),
        InlineNode::link("https://empty.example", vec![]),
    ])]);

    let encoded = encode(&doc);
    let block = encoded.blocks[0].as_text().unwrap();

    assert!(block.mark_defs.is_empty());
    assert_eq!(shape(&encoded), vec!["normal: Hi{}"]);
}

#[test]
fn unknown_nodes_are_skipped() {
    let doc = EditorDocument::new(vec![
        EditorNode::Unknown("poll".into()),
        EditorNode::paragraph(vec![
            InlineNode::Unknown("mention".into()),
            InlineNode::formatted("kept", TextFormat::CODE),
        ]),
    ]);

    assert_eq!(shape(&encode(&doc)), vec!["normal: kept{code}"]);
}

#[test]
fn lists_and_code_survive_a_cycle() {
    let mut nested = ListNode::new(ListKind::Number);
    nested
        .items
        .push(ListItemNode::new(vec![InlineNode::text("step one")]));
    let mut first = ListItemNode::new(vec![InlineNode::text("Setup")]);
    first.nested.push(nested);
    let mut list = ListNode::new(ListKind::Bullet);
    list.items.push(first);
    list.items
        .push(ListItemNode::new(vec![InlineNode::text("Usage")]));

    let doc = EditorDocument::new(vec![
        EditorNode::List(list),
        EditorNode::Code(CodeNode {
            code: "cargo run".into(),
            language: Some("sh".into()),
        }),
    ]);

    let encoded = encode(&doc);
    assert_eq!(
        shape(&encoded),
        vec![
            "normal Bullet@1: Setup{}",
            "normal Number@2: step one{}",
            "normal Bullet@1: Usage{}",
            "code Some(\"sh\") cargo run",
        ]
    );

    let json = encoded.to_json().unwrap();
    assert_eq!(decode(&json).unwrap().document, doc);
}

#[test]
fn unknown_annotation_keeps_block_text() {
    let json = r#"[{
        "_type": "block", "_key": "b1", "style": "normal",
        "markDefs": [{"_type": "internalLink", "_key": "x", "reference": {"_ref": "post-1"}}],
        "children": [{"_type": "span", "_key": "s1", "text": "keep me", "marks": ["x"]}]
    }]"#;

    let decoded = decode(json).unwrap();

    assert_eq!(
        decoded.document.children,
        vec![EditorNode::paragraph(vec![InlineNode::text("keep me")])]
    );
    assert_eq!(
        decoded.warnings,
        vec![DecodeWarning::IgnoredMarkDef {
            index: 0,
            type_name: "internalLink".into(),
        }]
    );
    assert_eq!(shape(&encode(&decoded.document)), vec!["normal: keep me{}"]);
}

#[test]
fn inline_object_is_reported_and_neighbours_survive() {
    let json = r#"[{
        "_type": "block", "_key": "b1", "style": "normal", "markDefs": [],
        "children": [
            {"_type": "span", "_key": "s1", "text": "Hi ", "marks": []},
            {"_type": "mention", "_key": "m1", "userId": "u1"},
            {"_type": "span", "_key": "s2", "text": "there", "marks": ["strong"]}
        ]
    }]"#;

    let decoded = decode(json).unwrap();

    assert_eq!(
        decoded.warnings,
        vec![DecodeWarning::UnsupportedInline {
            index: 0,
            type_name: "mention".into(),
        }]
    );
    assert_eq!(
        shape(&encode(&decoded.document)),
        vec!["normal: Hi {} | there{strong}"]
    );
}

#[test]
fn list_item_style_survives_a_cycle() {
    let json = r#"[
        {"_type": "block", "_key": "b1", "style": "h2", "listItem": "bullet", "level": 1,
         "markDefs": [], "children": [{"_type": "span", "_key": "s1", "text": "Heading item", "marks": []}]},
        {"_type": "block", "_key": "b2", "style": "blockquote", "listItem": "bullet", "level": 1,
         "markDefs": [], "children": [{"_type": "span", "_key": "s2", "text": "Quoted item", "marks": []}]}
    ]"#;

    let decoded = decode(json).unwrap();
    let EditorNode::List(list) = &decoded.document.children[0] else {
        panic!("expected a list, got {:?}", decoded.document.children);
    };
    assert_eq!(
        list.items[0].style,
        BlockStyle::Heading(HeadingLevel::new(2).unwrap())
    );
    assert_eq!(list.items[1].style, BlockStyle::Blockquote);

    let encoded = encode(&decoded.document);
    assert_eq!(
        shape(&encoded),
        vec![
            "h2 Bullet@1: Heading item{}",
            "blockquote Bullet@1: Quoted item{}"
        ]
    );
    assert_eq!(shape(&roundtrip(&encoded)), shape(&encoded));
}
