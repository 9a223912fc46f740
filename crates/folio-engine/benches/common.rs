// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_mdx_post(sections: usize) -> String {
    let mut content = String::from("---\ntitle: Benchmark post\n---\n\n");
    content.push_str("Opening paragraph with **bold** text.\n\n<!-- truncate -->\n\n");

    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str("Some paragraph content with *emphasis* and a [link](https://example.com/post). ");
        content.push_str("A second sentence keeps the paragraph realistic.\n\n");

        for i in 0..3 {
            content.push_str(&format!("- Item {i} in section {section}\n  - Nested detail\n"));
        }
        content.push('\n');

        if section % 3 == 0 {
            content.push_str("```rust\nfn benchmark_function() {\n    let value = 42;\n    println!(\"{}\", value);\n}\n```\n\n");
        }
        if section % 5 == 0 {
            content.push_str(&format!("![Figure {section}](/img/figure-{section}.png)\n\n"));
        }
    }

    content
}

/// A `lines`-line text and a revision that edits every `stride`th line.
#[allow(dead_code)]
pub fn generate_revision_pair(lines: usize, stride: usize) -> (String, String) {
    let old: Vec<String> = (0..lines).map(|i| format!("Line {i} of the post")).collect();
    let new: Vec<String> = old
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i % stride == 0 {
                format!("{line}, revised")
            } else {
                line.clone()
            }
        })
        .collect();
    (old.join("\n"), new.join("\n"))
}
