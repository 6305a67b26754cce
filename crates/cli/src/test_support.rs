use std::borrow::Cow;
use std::io::Write;
use tempfile::NamedTempFile;

pub const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
    <div id="id-1" class="class-1" data-id="data-id-1">text-A</div>
    <div id="id-2" class="class-1" data-id="data-id-2">text-B</div>
    <ul id="list"><li>1</li><li class="mid">2</li></ul>
</body>
</html>"#;

pub fn page_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(PAGE.as_bytes()).expect("write page");
    file
}

pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    if !input.contains('\u{1b}') {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    loop {
        match chars.next() {
            Some('\u{1b}') => {
                for next in chars.by_ref() {
                    if next == 'm' {
                        break;
                    }
                }
            }
            Some(ch) => result.push(ch),
            None => break,
        }
    }
    Cow::Owned(result)
}
