#![forbid(unsafe_code)]

use crate::info::{BaseInfo, Info, ModuleInfo};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write};

const XS_DATE_TIME: (&str, &str) = ("type", "xs:dateTime");

/// Human readable summary.
pub fn write_text(info: &Info, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "global update status: {}", info.global_status)?;
    if info.modules.is_empty() {
        writeln!(out, "no module reported")?;
    }

    for module in &info.modules {
        writeln!(out)?;
        writeln!(out, "module {}", module.name)?;
        writeln!(out, "  update status: {}", module.status)?;
        writeln!(out, "  update date:   {}", module.update_date)?;
        for base in &module.bases {
            writeln!(out, "  base {}", base.name)?;
            writeln!(out, "    date:       {}", base.date)?;
            writeln!(out, "    version:    {}", base.version)?;
            writeln!(out, "    signatures: {}", base.signature_count)?;
            writeln!(out, "    path:       {}", base.full_path)?;
        }
    }
    Ok(())
}

/// `uhuru-info` XML document, indented by two spaces.
pub fn write_xml(info: &Info, out: impl Write) -> Result<(), quick_xml::Error> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("uhuru-info")))?;

    text_element(&mut writer, "update-status", None, info.global_status.as_str())?;
    for module in &info.modules {
        write_module(&mut writer, module)?;
    }

    writer.write_event(Event::End(BytesEnd::new("uhuru-info")))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_module<W: Write>(writer: &mut Writer<W>, module: &ModuleInfo) -> Result<(), quick_xml::Error> {
    let start = BytesStart::new("module").with_attributes([("name", module.name.as_str())]);
    writer.write_event(Event::Start(start))?;

    text_element(writer, "update-status", None, module.status.as_str())?;
    text_element(writer, "update-date", Some(XS_DATE_TIME), &module.update_date)?;
    for base in &module.bases {
        write_base(writer, base)?;
    }

    writer.write_event(Event::End(BytesEnd::new("module")))?;
    Ok(())
}

fn write_base<W: Write>(writer: &mut Writer<W>, base: &BaseInfo) -> Result<(), quick_xml::Error> {
    let start = BytesStart::new("base").with_attributes([("name", base.name.as_str())]);
    writer.write_event(Event::Start(start))?;

    text_element(writer, "date", Some(XS_DATE_TIME), &base.date)?;
    text_element(writer, "version", None, &base.version)?;
    text_element(writer, "signature-count", None, &base.signature_count.to_string())?;
    text_element(writer, "full-path", None, &base.full_path)?;

    writer.write_event(Event::End(BytesEnd::new("base")))?;
    Ok(())
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attribute: Option<(&str, &str)>,
    text: &str,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(name);
    if let Some(attribute) = attribute {
        start.push_attribute(attribute);
    }
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }
    Ok(())
}
