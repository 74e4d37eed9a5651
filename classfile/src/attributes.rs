//! Attribute taxonomy and dispatch (JVMS §4.7).
//!
//! The teacher's `read_attributes` reads `name_index`/`length`, then
//! propagates any sub-decoder error with `?` — one malformed `Code`
//! attribute aborts the whole class. That contradicts the failure
//! semantics this format actually wants: a bad attribute payload should
//! just fall back to raw bytes and let the rest of the class parse. This
//! version slices out exactly `length` bytes into their own cursor before
//! dispatch, so a sub-decoder can never read past its own attribute, and
//! wraps every dispatch in a local `Result` that degrades to
//! [`AttributeVariant::Unknown`] plus a `tracing::warn!` rather than
//! bubbling up.

use byteorder::{ReadBytesExt, BE};
use std::io::{Cursor, Read};

use crate::constants::{utf8_at, ConstantPoolEntry};
use crate::errors::AttributeError;

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineNumberEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableEntry {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub index: u16,
}

/// A StackMapTable frame, stored as the leading tag byte plus the rest of
/// the frame's payload, uninterpreted rather than typed per frame kind.
#[derive(Debug, Clone, PartialEq)]
pub struct StackMapFrame {
    pub frame_type: u8,
    pub raw: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethod {
    pub bootstrap_method_ref: u16,
    pub bootstrap_arguments: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassEntry {
    pub inner_class_info_index: u16,
    pub outer_class_info_index: u16,
    pub inner_name_index: u16,
    pub inner_class_access_flags: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValue {
    pub tag: u8,
    pub payload: ElementValuePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValuePayload {
    ConstValueIndex(u16),
    EnumConstValue { type_name_index: u16, const_name_index: u16 },
    ClassInfoIndex(u16),
    AnnotationValue(Annotation),
    ArrayValue(Vec<ElementValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
    pub element_name_index: u16,
    pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_index: u16,
    pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypePathEntry {
    pub type_path_kind: u8,
    pub type_argument_index: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub target_type: u8,
    /// Target-info layout depends on `target_type` (Table 4.7.20.1-A); kept
    /// raw rather than typed per target kind.
    pub target_info: Vec<u8>,
    pub type_path: Vec<TypePathEntry>,
    pub annotation: Annotation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAnnotations {
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordComponent {
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRequires {
    pub requires_index: u16,
    pub requires_flags: u16,
    pub requires_version_index: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExports {
    pub exports_index: u16,
    pub exports_flags: u16,
    pub exports_to_index: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleOpens {
    pub opens_index: u16,
    pub opens_flags: u16,
    pub opens_to_index: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProvides {
    pub provides_index: u16,
    pub provides_with_index: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleAttribute {
    pub module_name_index: u16,
    pub module_flags: u16,
    pub module_version_index: u16,
    pub requires: Vec<ModuleRequires>,
    pub exports: Vec<ModuleExports>,
    pub opens: Vec<ModuleOpens>,
    pub uses_index: Vec<u16>,
    pub provides: Vec<ModuleProvides>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Vec<AttributeInfo>,
}

/// The full attribute taxonomy. `Unknown` is the fallback
/// both for attribute names the format doesn't recognise and for a known
/// name whose payload failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeVariant {
    ConstantValue { constantvalue_index: u16 },
    Code(Code),
    StackMapTable(Vec<StackMapFrame>),
    Exceptions { exception_index_table: Vec<u16> },
    InnerClasses(Vec<InnerClassEntry>),
    EnclosingMethod { class_index: u16, method_index: u16 },
    Synthetic,
    Signature { signature_index: u16 },
    SourceFile { sourcefile_index: u16 },
    SourceDebugExtension(Vec<u8>),
    LineNumberTable(Vec<LineNumberEntry>),
    LocalVariableTable(Vec<LocalVariableEntry>),
    LocalVariableTypeTable(Vec<LocalVariableEntry>),
    Deprecated,
    RuntimeVisibleAnnotations(Vec<Annotation>),
    RuntimeInvisibleAnnotations(Vec<Annotation>),
    RuntimeVisibleParameterAnnotations(Vec<ParameterAnnotations>),
    RuntimeInvisibleParameterAnnotations(Vec<ParameterAnnotations>),
    RuntimeVisibleTypeAnnotations(Vec<TypeAnnotation>),
    RuntimeInvisibleTypeAnnotations(Vec<TypeAnnotation>),
    AnnotationDefault(ElementValue),
    BootstrapMethods(Vec<BootstrapMethod>),
    MethodParameters(Vec<(u16, u16)>),
    Module(ModuleAttribute),
    ModulePackages(Vec<u16>),
    ModuleMainClass { main_class_index: u16 },
    NestHost { host_class_index: u16 },
    NestMembers(Vec<u16>),
    Record(Vec<RecordComponent>),
    PermittedSubclasses(Vec<u16>),
    Unknown { raw: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub attribute_name_index: u16,
    pub name: String,
    pub variant: AttributeVariant,
    /// The attribute's payload, always kept even when `variant` parsed
    /// successfully, so a caller needing the untouched bytes never has to
    /// re-derive them.
    pub raw: Vec<u8>,
}

fn bounds(msg: impl Into<String>) -> AttributeError {
    AttributeError::new("<reading>", msg)
}

fn read_u16(c: &mut Cursor<&[u8]>) -> Result<u16, AttributeError> {
    c.read_u16::<BE>().map_err(|_| bounds("ran out of bytes reading a u2"))
}

fn read_u32(c: &mut Cursor<&[u8]>) -> Result<u32, AttributeError> {
    c.read_u32::<BE>().map_err(|_| bounds("ran out of bytes reading a u4"))
}

fn read_u8(c: &mut Cursor<&[u8]>) -> Result<u8, AttributeError> {
    c.read_u8().map_err(|_| bounds("ran out of bytes reading a u1"))
}

fn read_bytes(c: &mut Cursor<&[u8]>, len: usize) -> Result<Vec<u8>, AttributeError> {
    let mut buf = vec![0u8; len];
    c.read_exact(&mut buf).map_err(|_| bounds("ran out of bytes reading a fixed-size payload"))?;
    Ok(buf)
}

fn verification_type_info_len(tag: u8) -> usize {
    match tag {
        7 | 8 => 3,
        _ => 1,
    }
}

fn read_stack_map_table(c: &mut Cursor<&[u8]>) -> Result<Vec<StackMapFrame>, AttributeError> {
    let count = read_u16(c)?;
    let mut frames = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let tag = read_u8(c)?;
        let mut raw = Vec::new();
        match tag {
            0..=63 => {}
            64..=127 => raw.extend(read_verification_type_info(c)?),
            247 => {
                raw.extend(read_bytes(c, 2)?);
                raw.extend(read_verification_type_info(c)?);
            }
            248..=250 => raw.extend(read_bytes(c, 2)?),
            251 => raw.extend(read_bytes(c, 2)?),
            252..=254 => {
                raw.extend(read_bytes(c, 2)?);
                let n = (tag - 251) as usize;
                for _ in 0..n {
                    raw.extend(read_verification_type_info(c)?);
                }
            }
            255 => {
                raw.extend(read_bytes(c, 2)?); // offset_delta
                let locals_count = read_u16(c)?;
                raw.extend(locals_count.to_be_bytes());
                for _ in 0..locals_count {
                    raw.extend(read_verification_type_info(c)?);
                }
                let stack_count = read_u16(c)?;
                raw.extend(stack_count.to_be_bytes());
                for _ in 0..stack_count {
                    raw.extend(read_verification_type_info(c)?);
                }
            }
            _ => return Err(bounds(format!("unrecognised stack map frame tag {tag}"))),
        }
        frames.push(StackMapFrame { frame_type: tag, raw });
    }
    Ok(frames)
}

fn read_verification_type_info(c: &mut Cursor<&[u8]>) -> Result<Vec<u8>, AttributeError> {
    let tag = read_u8(c)?;
    let len = verification_type_info_len(tag);
    let mut out = vec![tag];
    out.extend(read_bytes(c, len - 1)?);
    Ok(out)
}

fn read_element_value(c: &mut Cursor<&[u8]>) -> Result<ElementValue, AttributeError> {
    let tag = read_u8(c)?;
    let payload = match tag {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => {
            ElementValuePayload::ConstValueIndex(read_u16(c)?)
        }
        b'e' => ElementValuePayload::EnumConstValue {
            type_name_index: read_u16(c)?,
            const_name_index: read_u16(c)?,
        },
        b'c' => ElementValuePayload::ClassInfoIndex(read_u16(c)?),
        b'@' => ElementValuePayload::AnnotationValue(read_annotation(c)?),
        b'[' => {
            let count = read_u16(c)?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(read_element_value(c)?);
            }
            ElementValuePayload::ArrayValue(values)
        }
        other => return Err(bounds(format!("unrecognised element-value tag '{}'", other as char))),
    };
    Ok(ElementValue { tag, payload })
}

fn read_annotation(c: &mut Cursor<&[u8]>) -> Result<Annotation, AttributeError> {
    let type_index = read_u16(c)?;
    let pair_count = read_u16(c)?;
    let mut element_value_pairs = Vec::with_capacity(pair_count as usize);
    for _ in 0..pair_count {
        let element_name_index = read_u16(c)?;
        let value = read_element_value(c)?;
        element_value_pairs.push(ElementValuePair { element_name_index, value });
    }
    Ok(Annotation { type_index, element_value_pairs })
}

fn read_annotations(c: &mut Cursor<&[u8]>) -> Result<Vec<Annotation>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_annotation(c)?);
    }
    Ok(out)
}

fn read_parameter_annotations(c: &mut Cursor<&[u8]>) -> Result<Vec<ParameterAnnotations>, AttributeError> {
    let num_parameters = read_u8(c)?;
    let mut out = Vec::with_capacity(num_parameters as usize);
    for _ in 0..num_parameters {
        out.push(ParameterAnnotations { annotations: read_annotations(c)? });
    }
    Ok(out)
}

fn target_info_len(target_type: u8) -> Option<usize> {
    match target_type {
        0x00 | 0x01 => Some(1),
        0x10 => Some(2),
        0x11 | 0x12 => Some(1),
        0x13 | 0x14 | 0x15 => Some(0),
        0x16 => Some(1),
        0x17 => Some(2),
        0x40 | 0x41 => None, // table-driven, handled separately
        0x42 => Some(2),
        0x43..=0x46 => Some(2),
        0x47..=0x4B => Some(3),
        _ => None,
    }
}

fn read_type_annotation(c: &mut Cursor<&[u8]>) -> Result<TypeAnnotation, AttributeError> {
    let target_type = read_u8(c)?;
    let target_info = if target_type == 0x40 || target_type == 0x41 {
        let table_len = read_u16(c)?;
        let mut buf = Vec::new();
        buf.extend(table_len.to_be_bytes());
        buf.extend(read_bytes(c, table_len as usize * 6)?);
        buf
    } else {
        let len = target_info_len(target_type)
            .ok_or_else(|| bounds(format!("unrecognised type-annotation target_type {target_type:#x}")))?;
        read_bytes(c, len)?
    };
    let path_length = read_u8(c)?;
    let mut type_path = Vec::with_capacity(path_length as usize);
    for _ in 0..path_length {
        type_path.push(TypePathEntry { type_path_kind: read_u8(c)?, type_argument_index: read_u8(c)? });
    }
    let annotation = read_annotation(c)?;
    Ok(TypeAnnotation { target_type, target_info, type_path, annotation })
}

fn read_type_annotations(c: &mut Cursor<&[u8]>) -> Result<Vec<TypeAnnotation>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_type_annotation(c)?);
    }
    Ok(out)
}

fn read_code(c: &mut Cursor<&[u8]>, pool: &[ConstantPoolEntry]) -> Result<Code, AttributeError> {
    let max_stack = read_u16(c)?;
    let max_locals = read_u16(c)?;
    let code_length = read_u32(c)?;
    let code = read_bytes(c, code_length as usize)?;
    let exception_table_length = read_u16(c)?;
    let mut exception_table = Vec::with_capacity(exception_table_length as usize);
    for _ in 0..exception_table_length {
        exception_table.push(ExceptionTableEntry {
            start_pc: read_u16(c)?,
            end_pc: read_u16(c)?,
            handler_pc: read_u16(c)?,
            catch_type: read_u16(c)?,
        });
    }
    let attributes_count = read_u16(c)?;
    let mut attributes = Vec::with_capacity(attributes_count as usize);
    for _ in 0..attributes_count {
        attributes.push(read_attribute(c, pool)?);
    }
    Ok(Code { max_stack, max_locals, code, exception_table, attributes })
}

fn read_u16_list(c: &mut Cursor<&[u8]>) -> Result<Vec<u16>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_u16(c)?);
    }
    Ok(out)
}

fn read_line_number_table(c: &mut Cursor<&[u8]>) -> Result<Vec<LineNumberEntry>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(LineNumberEntry { start_pc: read_u16(c)?, line_number: read_u16(c)? });
    }
    Ok(out)
}

fn read_local_variable_table(c: &mut Cursor<&[u8]>) -> Result<Vec<LocalVariableEntry>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(LocalVariableEntry {
            start_pc: read_u16(c)?,
            length: read_u16(c)?,
            name_index: read_u16(c)?,
            descriptor_index: read_u16(c)?,
            index: read_u16(c)?,
        });
    }
    Ok(out)
}

fn read_inner_classes(c: &mut Cursor<&[u8]>) -> Result<Vec<InnerClassEntry>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(InnerClassEntry {
            inner_class_info_index: read_u16(c)?,
            outer_class_info_index: read_u16(c)?,
            inner_name_index: read_u16(c)?,
            inner_class_access_flags: read_u16(c)?,
        });
    }
    Ok(out)
}

fn read_bootstrap_methods(c: &mut Cursor<&[u8]>) -> Result<Vec<BootstrapMethod>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let bootstrap_method_ref = read_u16(c)?;
        out.push(BootstrapMethod { bootstrap_method_ref, bootstrap_arguments: read_u16_list(c)? });
    }
    Ok(out)
}

fn read_method_parameters(c: &mut Cursor<&[u8]>) -> Result<Vec<(u16, u16)>, AttributeError> {
    let count = read_u8(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push((read_u16(c)?, read_u16(c)?));
    }
    Ok(out)
}

fn read_module(c: &mut Cursor<&[u8]>) -> Result<ModuleAttribute, AttributeError> {
    let module_name_index = read_u16(c)?;
    let module_flags = read_u16(c)?;
    let module_version_index = read_u16(c)?;

    let requires_count = read_u16(c)?;
    let mut requires = Vec::with_capacity(requires_count as usize);
    for _ in 0..requires_count {
        requires.push(ModuleRequires {
            requires_index: read_u16(c)?,
            requires_flags: read_u16(c)?,
            requires_version_index: read_u16(c)?,
        });
    }

    let exports_count = read_u16(c)?;
    let mut exports = Vec::with_capacity(exports_count as usize);
    for _ in 0..exports_count {
        let exports_index = read_u16(c)?;
        let exports_flags = read_u16(c)?;
        exports.push(ModuleExports { exports_index, exports_flags, exports_to_index: read_u16_list(c)? });
    }

    let opens_count = read_u16(c)?;
    let mut opens = Vec::with_capacity(opens_count as usize);
    for _ in 0..opens_count {
        let opens_index = read_u16(c)?;
        let opens_flags = read_u16(c)?;
        opens.push(ModuleOpens { opens_index, opens_flags, opens_to_index: read_u16_list(c)? });
    }

    let uses_index = read_u16_list(c)?;

    let provides_count = read_u16(c)?;
    let mut provides = Vec::with_capacity(provides_count as usize);
    for _ in 0..provides_count {
        let provides_index = read_u16(c)?;
        provides.push(ModuleProvides { provides_index, provides_with_index: read_u16_list(c)? });
    }

    Ok(ModuleAttribute {
        module_name_index,
        module_flags,
        module_version_index,
        requires,
        exports,
        opens,
        uses_index,
        provides,
    })
}

fn read_record(c: &mut Cursor<&[u8]>, pool: &[ConstantPoolEntry]) -> Result<Vec<RecordComponent>, AttributeError> {
    let count = read_u16(c)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_index = read_u16(c)?;
        let descriptor_index = read_u16(c)?;
        let attr_count = read_u16(c)?;
        let mut attributes = Vec::with_capacity(attr_count as usize);
        for _ in 0..attr_count {
            attributes.push(read_attribute(c, pool)?);
        }
        out.push(RecordComponent { name_index, descriptor_index, attributes });
    }
    Ok(out)
}

/// Dispatches one already name-resolved attribute body. `pool` is needed
/// only by nested attribute lists (`Code`, `Record` components) that read
/// more attributes recursively.
fn decode_variant(name: &str, body: &[u8], pool: &[ConstantPoolEntry]) -> Result<AttributeVariant, AttributeError> {
    let mut c = Cursor::new(body);
    let variant = match name {
        "ConstantValue" => AttributeVariant::ConstantValue { constantvalue_index: read_u16(&mut c)? },
        "Code" => AttributeVariant::Code(read_code(&mut c, pool)?),
        "StackMapTable" => AttributeVariant::StackMapTable(read_stack_map_table(&mut c)?),
        "Exceptions" => AttributeVariant::Exceptions { exception_index_table: read_u16_list(&mut c)? },
        "InnerClasses" => AttributeVariant::InnerClasses(read_inner_classes(&mut c)?),
        "EnclosingMethod" => AttributeVariant::EnclosingMethod { class_index: read_u16(&mut c)?, method_index: read_u16(&mut c)? },
        "Synthetic" => AttributeVariant::Synthetic,
        "Signature" => AttributeVariant::Signature { signature_index: read_u16(&mut c)? },
        "SourceFile" => AttributeVariant::SourceFile { sourcefile_index: read_u16(&mut c)? },
        "SourceDebugExtension" => AttributeVariant::SourceDebugExtension(body.to_vec()),
        "LineNumberTable" => AttributeVariant::LineNumberTable(read_line_number_table(&mut c)?),
        "LocalVariableTable" => AttributeVariant::LocalVariableTable(read_local_variable_table(&mut c)?),
        "LocalVariableTypeTable" => AttributeVariant::LocalVariableTypeTable(read_local_variable_table(&mut c)?),
        "Deprecated" => AttributeVariant::Deprecated,
        "RuntimeVisibleAnnotations" => AttributeVariant::RuntimeVisibleAnnotations(read_annotations(&mut c)?),
        "RuntimeInvisibleAnnotations" => AttributeVariant::RuntimeInvisibleAnnotations(read_annotations(&mut c)?),
        "RuntimeVisibleParameterAnnotations" => {
            AttributeVariant::RuntimeVisibleParameterAnnotations(read_parameter_annotations(&mut c)?)
        }
        "RuntimeInvisibleParameterAnnotations" => {
            AttributeVariant::RuntimeInvisibleParameterAnnotations(read_parameter_annotations(&mut c)?)
        }
        "RuntimeVisibleTypeAnnotations" => AttributeVariant::RuntimeVisibleTypeAnnotations(read_type_annotations(&mut c)?),
        "RuntimeInvisibleTypeAnnotations" => AttributeVariant::RuntimeInvisibleTypeAnnotations(read_type_annotations(&mut c)?),
        "AnnotationDefault" => AttributeVariant::AnnotationDefault(read_element_value(&mut c)?),
        "BootstrapMethods" => AttributeVariant::BootstrapMethods(read_bootstrap_methods(&mut c)?),
        "MethodParameters" => AttributeVariant::MethodParameters(read_method_parameters(&mut c)?),
        "Module" => AttributeVariant::Module(read_module(&mut c)?),
        "ModulePackages" => AttributeVariant::ModulePackages(read_u16_list(&mut c)?),
        "ModuleMainClass" => AttributeVariant::ModuleMainClass { main_class_index: read_u16(&mut c)? },
        "NestHost" => AttributeVariant::NestHost { host_class_index: read_u16(&mut c)? },
        "NestMembers" => AttributeVariant::NestMembers(read_u16_list(&mut c)?),
        "Record" => AttributeVariant::Record(read_record(&mut c, pool)?),
        "PermittedSubclasses" => AttributeVariant::PermittedSubclasses(read_u16_list(&mut c)?),
        _ => AttributeVariant::Unknown { raw: body.to_vec() },
    };
    Ok(variant)
}

/// Reads one `attribute_info` structure: `name_index` (u2), `length` (u4),
/// then exactly `length` bytes. The payload is sliced out before dispatch so
/// a malformed sub-decoder can only ever run off the end of its own
/// attribute, never into the next one; any dispatch error degrades to
/// `Unknown` with the raw bytes kept, never aborting the caller's loop.
pub fn read_attribute(cursor: &mut Cursor<&[u8]>, pool: &[ConstantPoolEntry]) -> Result<AttributeInfo, AttributeError> {
    let attribute_name_index = read_u16(cursor)?;
    let length = read_u32(cursor)?;
    let raw = read_bytes(cursor, length as usize)?;
    let name = utf8_at(pool, attribute_name_index).unwrap_or("").to_string();

    let variant = match decode_variant(&name, &raw, pool) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(attribute = %name, error = %e, "malformed attribute payload, falling back to raw bytes");
            AttributeVariant::Unknown { raw: raw.clone() }
        }
    };

    Ok(AttributeInfo { attribute_name_index, name, variant, raw })
}

pub fn read_attributes(cursor: &mut Cursor<&[u8]>, pool: &[ConstantPoolEntry], count: u16) -> Result<Vec<AttributeInfo>, AttributeError> {
    let mut attrs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        attrs.push(read_attribute(cursor, pool)?);
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_pool(name: &str) -> Vec<ConstantPoolEntry> {
        vec![ConstantPoolEntry::Utf8(name.to_string())]
    }

    #[test]
    fn unknown_attribute_name_preserves_raw_bytes() {
        let pool = utf8_pool("TotallyMadeUp");
        let mut data = Vec::new();
        data.extend(1u16.to_be_bytes()); // name_index -> "TotallyMadeUp"
        data.extend(3u32.to_be_bytes()); // length
        data.extend([9, 8, 7]);
        let mut cursor = Cursor::new(data.as_slice());
        let attr = read_attribute(&mut cursor, &pool).unwrap();
        assert_eq!(attr.name, "TotallyMadeUp");
        assert!(matches!(attr.variant, AttributeVariant::Unknown { .. }));
        assert_eq!(attr.raw, vec![9, 8, 7]);
    }

    #[test]
    fn malformed_known_attribute_falls_back_without_aborting() {
        let pool = utf8_pool("ConstantValue");
        let mut data = Vec::new();
        data.extend(1u16.to_be_bytes());
        data.extend(1u32.to_be_bytes()); // length 1, but ConstantValue needs 2
        data.extend([0xFF]);
        let mut cursor = Cursor::new(data.as_slice());
        let attr = read_attribute(&mut cursor, &pool).unwrap();
        assert!(matches!(attr.variant, AttributeVariant::Unknown { .. }));
    }

    #[test]
    fn stack_map_table_append_frame_raw_length_sums_components() {
        // tag 253 -> append_frame with N = 253 - 251 = 2 verification infos.
        let mut body = Vec::new();
        body.extend(1u16.to_be_bytes()); // number_of_entries
        body.push(253);
        body.extend([0, 1]); // offset_delta
        body.extend([7, 0, 1]); // Object verification type, cpool index 1 -> 3 bytes
        body.push(1); // Integer verification type -> 1 byte
        let mut c = Cursor::new(body.as_slice());
        let frames = read_stack_map_table(&mut c).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame_type, 253);
        assert_eq!(frames[0].raw.len(), 2 + 3 + 1);
    }

    #[test]
    fn code_attribute_nests_line_number_table() {
        let pool = utf8_pool("LineNumberTable");
        let mut lnt_body = Vec::new();
        lnt_body.extend(1u16.to_be_bytes());
        lnt_body.extend(0u16.to_be_bytes());
        lnt_body.extend(42u16.to_be_bytes());

        let mut nested_attr = Vec::new();
        nested_attr.extend(1u16.to_be_bytes());
        nested_attr.extend((lnt_body.len() as u32).to_be_bytes());
        nested_attr.extend(lnt_body);

        let mut code_body = Vec::new();
        code_body.extend(2u16.to_be_bytes()); // max_stack
        code_body.extend(1u16.to_be_bytes()); // max_locals
        code_body.extend(1u32.to_be_bytes()); // code_length
        code_body.push(0xB1); // return
        code_body.extend(0u16.to_be_bytes()); // exception_table_length
        code_body.extend(1u16.to_be_bytes()); // attributes_count
        code_body.extend(nested_attr);

        let mut c = Cursor::new(code_body.as_slice());
        let code = read_code(&mut c, &pool).unwrap();
        assert_eq!(code.code, vec![0xB1]);
        assert_eq!(code.attributes.len(), 1);
        assert!(matches!(code.attributes[0].variant, AttributeVariant::LineNumberTable(_)));
    }
}
