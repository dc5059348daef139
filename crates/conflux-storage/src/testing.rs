//! Test helpers.

use quick_xml::Reader;
use quick_xml::events::Event;

/// Panic unless `storage` parses as XML once wrapped in a root element
/// declaring the storage-format namespaces.
pub(crate) fn assert_well_formed(storage: &str) {
    let xml = format!(
        r#"<root xmlns:ac="http://atlassian.com/content" xmlns:ri="http://atlassian.com/resource/identifier">{storage}</root>"#
    );
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().check_end_names = true;
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => panic!("not well-formed ({err}): {storage}"),
        }
    }
}
