use rxreport_lib::dom::dom_tree::{self, Handle, NodeData};
use rxreport_lib::parser::html_tree::{create_dom_tree, create_fragment_tree};

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect_structure(node: &Handle) -> String {
        let mut output = String::new();
        for child in &node.borrow().children {
            traverse_node(child, 0, &mut output);
        }
        output
    }

    fn traverse_node(node: &Handle, depth: usize, output: &mut String) {
        let node_ref = node.borrow();
        match &node_ref.data {
            NodeData::Element(elem_node) => {
                *output += &format!("{}<{}>\n", "  ".repeat(depth), elem_node.tag);
                for child in &node_ref.children {
                    traverse_node(child, depth + 1, output);
                }
            }
            NodeData::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    *output += &format!("{}{}\n", "  ".repeat(depth), trimmed);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_basic_structure() {
        let html = r#"
            <!DOCTYPE html>
            <html>
                <head>
                    <title>Test</title>
                </head>
                <body>
                    <h1>Hello</h1>
                    <p>World</p>
                </body>
            </html>
        "#;

        let document = create_dom_tree(html);
        let structure = collect_structure(&document.root);

        let expected = r#"
<html>
  <head>
    <title>
      Test
  <body>
    <h1>
      Hello
    <p>
      World
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_fragment_structure() {
        let html = r#"
            <style>#a { color: red }</style>
            <table id="T">
                <tr><td id="a">1</td></tr>
            </table>
        "#;

        let document = create_fragment_tree(html);
        let structure = collect_structure(&document.content_root());

        let expected = r#"
<style>
  #a { color: red }
<table>
  <tbody>
    <tr>
      <td>
        1
"#;
        assert_eq!(structure.trim(), expected.trim());
    }

    #[test]
    fn test_void_elements_serialize_without_end_tags() {
        let html = r#"<img src="test.jpg" alt="Test"><br><input type="text">"#;
        let document = create_fragment_tree(html);
        assert_eq!(document.to_html().unwrap(), html);
    }

    #[test]
    fn test_parent_pointers() {
        let document = create_fragment_tree("<div><p>x</p></div>");
        let html = document.content_root();
        let div = html.borrow().children[0].clone();
        let p = div.borrow().children[0].clone();
        let parent = dom_tree::parent_of(&p).unwrap();
        assert!(std::rc::Rc::ptr_eq(&parent, &div));
    }

    #[test]
    fn test_comments_and_text_survive() {
        let html = "<!-- note --><p>a &amp; b &lt; c</p>";
        let document = create_fragment_tree(html);
        assert_eq!(document.to_html().unwrap(), html);
    }

    #[test]
    fn test_full_document_round_trip() {
        let html = "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(document.to_html().unwrap(), html);
    }
}
