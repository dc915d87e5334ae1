use pretty_assertions::assert_eq;
use rxreport_lib::notebook::{read_notebook, write_notebook};
use rxreport_lib::Error;
use std::fs;
use std::path::PathBuf;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rxreport-{}-{}", std::process::id(), name))
}

#[test]
fn written_notebook_holds_the_html_verbatim() {
    let html = "<style>#a{x:1}</style>\n<table>\n  <tr><td id=\"a\">é &amp; 1</td></tr>\n</table>\n";
    let path = scratch_path("verbatim.ipynb");

    write_notebook(html, &path).unwrap();
    let notebook = read_notebook(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(notebook.nbformat, 4);
    assert_eq!(notebook.cells.len(), 1);
    assert_eq!(notebook.cells[0].cell_type, "markdown");
    assert_eq!(notebook.cells[0].source_text(), html);
}

#[test]
fn empty_html_gives_an_empty_cell() {
    let path = scratch_path("empty.ipynb");

    write_notebook("", &path).unwrap();
    let notebook = read_notebook(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(notebook.cells.len(), 1);
    assert_eq!(notebook.cells[0].source_text(), "");
}

#[test]
fn unwritable_path_is_an_io_error() {
    let path = scratch_path("missing-dir").join("nested").join("out.ipynb");
    let err = write_notebook("<p>x</p>", &path).unwrap_err();
    assert!(matches!(err, Error::IOError(_)));
}
