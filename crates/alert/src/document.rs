#![forbid(unsafe_code)]

use crate::error::Error;
use crate::identification::Identification;
use crate::report::Report;
use chrono::NaiveDateTime;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

pub const ALERT_NAMESPACE: &str = "http://www.davfi-project.org/AlertSchema";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
// The trailing space is part of the published schema location.
pub const SCHEMA_LOCATION: &str = "http://www.davfi-project.org/AlertSchema AlertSchema.xsd ";

const ALERT_CODE: &str = "a";
const ALERT_LEVEL: &str = "2";

/// Format of the `gdh` element, e.g. `2001-12-31T12:00:00`.
pub const GDH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One alert, ready to be serialized.
///
/// Built per report and dropped after sending; nothing is shared between
/// alerts.
#[derive(Debug, Clone)]
pub struct AlertDocument<'a> {
    report: &'a Report,
    timestamp: NaiveDateTime,
    identification: Identification,
}

impl<'a> AlertDocument<'a> {
    pub fn new(report: &'a Report, timestamp: NaiveDateTime, identification: Identification) -> Self {
        Self {
            report,
            timestamp,
            identification,
        }
    }

    /// Serialize to an indented UTF-8 document with an XML declaration.
    pub fn to_xml(&self) -> Result<String, Error> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let root = BytesStart::new("alert").with_attributes([
            ("xmlns", ALERT_NAMESPACE),
            ("xmlns:xsi", XSI_NAMESPACE),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
        ]);
        writer.write_event(Event::Start(root))?;

        text_element(&mut writer, "code", &[], ALERT_CODE)?;
        text_element(&mut writer, "level", &[], ALERT_LEVEL)?;
        text_element(&mut writer, "uri", &[("type", "path")], &self.report.path)?;

        let gdh = self.timestamp.format(GDH_FORMAT).to_string();
        text_element(&mut writer, "gdh", &[], &gdh)?;

        writer.write_event(Event::Start(BytesStart::new("identification")))?;
        text_element(&mut writer, "user", &[], &self.identification.user)?;
        text_element(&mut writer, "hostname", &[], &self.identification.hostname)?;
        text_element(&mut writer, "ip", &[], &self.identification.ip)?;
        text_element(&mut writer, "os", &[], &self.identification.os)?;
        writer.write_event(Event::End(BytesEnd::new("identification")))?;

        text_element(&mut writer, "module", &[], &self.report.module)?;
        text_element(&mut writer, "module_specific", &[], &self.report.module_report)?;

        writer.write_event(Event::End(BytesEnd::new("alert")))?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Write `<name attrs>text</name>`, or `<name attrs/>` when `text` is empty.
fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<(), Error> {
    let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use quick_xml::Reader;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap()
    }

    fn identification() -> Identification {
        Identification {
            user: "jdoe".into(),
            hostname: "scanner".into(),
            ip: "192.168.1.12".into(),
            os: "Linux".into(),
        }
    }

    /// Text of the first element called `name`, unescaped.
    fn element_text(xml: &str, name: &str) -> Option<String> {
        let mut reader = Reader::from_str(xml);
        let mut capture: Option<String> = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == name.as_bytes() => {
                    capture = Some(String::new());
                }
                Event::Empty(e) if e.name().as_ref() == name.as_bytes() => {
                    return Some(String::new());
                }
                Event::Text(t) => {
                    if let Some(text) = capture.as_mut() {
                        text.push_str(&t.unescape().unwrap());
                    }
                }
                Event::End(e) if e.name().as_ref() == name.as_bytes() => return capture,
                Event::Eof => return None,
                _ => {}
            }
        }
    }

    /// Names of all elements in document order.
    fn element_names(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut names = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap());
                }
                Event::Eof => return names,
                _ => {}
            }
        }
    }

    #[test]
    fn document_layout() {
        let report = Report::new("/home/jdoe/eicar.com", Status::Malware)
            .with_module("clamav", "Eicar-Test-Signature");
        let xml = AlertDocument::new(&report, timestamp(), identification())
            .to_xml()
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<alert xmlns=\"http://www.davfi-project.org/AlertSchema\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:schemaLocation=\"http://www.davfi-project.org/AlertSchema AlertSchema.xsd \">"
        ));
        assert!(xml.contains("<uri type=\"path\">/home/jdoe/eicar.com</uri>"));
        assert!(xml.contains("<gdh>2014-03-07T09:05:01</gdh>"));

        assert_eq!(
            element_names(&xml),
            vec![
                "alert",
                "code",
                "level",
                "uri",
                "gdh",
                "identification",
                "user",
                "hostname",
                "ip",
                "os",
                "module",
                "module_specific",
            ]
        );
        assert_eq!(element_text(&xml, "code").as_deref(), Some("a"));
        assert_eq!(element_text(&xml, "level").as_deref(), Some("2"));
        assert_eq!(element_text(&xml, "user").as_deref(), Some("jdoe"));
        assert_eq!(element_text(&xml, "hostname").as_deref(), Some("scanner"));
        assert_eq!(element_text(&xml, "ip").as_deref(), Some("192.168.1.12"));
        assert_eq!(element_text(&xml, "os").as_deref(), Some("Linux"));
        assert_eq!(element_text(&xml, "module").as_deref(), Some("clamav"));
        assert_eq!(
            element_text(&xml, "module_specific").as_deref(),
            Some("Eicar-Test-Signature")
        );
    }

    #[test]
    fn month_is_one_based() {
        let report = Report::new("/tmp/x", Status::Suspicious);
        let december = NaiveDate::from_ymd_opt(2001, 12, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let xml = AlertDocument::new(&report, december, identification())
            .to_xml()
            .unwrap();
        assert_eq!(
            element_text(&xml, "gdh").as_deref(),
            Some("2001-12-31T12:00:00")
        );
    }

    #[test]
    fn missing_identity_fields_stay_present() {
        let report = Report::new("/tmp/x", Status::Malware);
        let identification = Identification {
            os: "Linux".into(),
            ..Default::default()
        };
        let xml = AlertDocument::new(&report, timestamp(), identification)
            .to_xml()
            .unwrap();

        assert!(xml.contains("<ip/>"));
        assert_eq!(element_text(&xml, "user").as_deref(), Some(""));
        assert_eq!(element_text(&xml, "module").as_deref(), Some(""));
    }

    proptest! {
        #[test]
        fn path_and_module_are_verbatim(
            path in "[a-zA-Z0-9 /._&<>\"'-]{1,48}",
            module in "[a-zA-Z0-9 _&<>-]{0,16}",
        ) {
            let report = Report::new(path.clone(), Status::Malware)
                .with_module(module.clone(), "sig");
            let xml = AlertDocument::new(&report, timestamp(), identification())
                .to_xml()
                .unwrap();

            prop_assert_eq!(element_text(&xml, "uri"), Some(path));
            prop_assert_eq!(element_text(&xml, "module"), Some(module));
        }
    }
}
