//! The top-level `Class` record (JVMS §4.1) and its entry point,
//! [`parse_class`].

use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

use crate::access_flags::ClassAccessFlags;
use crate::attributes::{read_attributes, AttributeInfo};
use crate::constants::{pool_get, read_constant_pool, utf8_at, ConstantPoolEntry};
use crate::errors::{FormatCause, FormatError};
use crate::field_method::{read_fields, read_methods, FieldInfo, MethodInfo};

pub const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Debug, Clone)]
pub struct Class {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: Vec<ConstantPoolEntry>,
    pub access_flags: Vec<ClassAccessFlags>,
    pub this_class: u16,
    /// 0 means "no superclass" (only `java.lang.Object` itself).
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl Class {
    pub fn this_class_name(&self) -> Option<&str> {
        self.class_name_at(self.this_class)
    }

    pub fn super_class_name(&self) -> Option<&str> {
        if self.super_class == 0 {
            return None;
        }
        self.class_name_at(self.super_class)
    }

    fn class_name_at(&self, index: u16) -> Option<&str> {
        match pool_get(&self.constant_pool, index) {
            Some(ConstantPoolEntry::Class { name_index }) => utf8_at(&self.constant_pool, *name_index),
            _ => None,
        }
    }

    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces.iter().filter_map(|idx| self.class_name_at(*idx)).collect()
    }
}

fn read_u16(cursor: &mut Cursor<&[u8]>, while_reading: &'static str) -> Result<u16, FormatError> {
    cursor.read_u16::<BE>().map_err(|_| FormatError::new(FormatCause::Truncated { offset: cursor.position(), while_reading }, "unexpected end of input"))
}

fn read_u32(cursor: &mut Cursor<&[u8]>, while_reading: &'static str) -> Result<u32, FormatError> {
    cursor.read_u32::<BE>().map_err(|_| FormatError::new(FormatCause::Truncated { offset: cursor.position(), while_reading }, "unexpected end of input"))
}

/// Decodes a full `.class` file. Fatal failures (truncation, bad magic, an
/// invalid constant-pool tag, leftover bytes after the attribute table) stop
/// the parse immediately; malformed individual attributes do not (see
/// `attributes::read_attribute`).
pub fn parse_class(bytes: &[u8]) -> Result<Class, FormatError> {
    let mut cursor = Cursor::new(bytes);

    let magic = read_u32(&mut cursor, "magic")?;
    if magic != MAGIC {
        return Err(FormatError::new(FormatCause::IncorrectMagic(magic), "expected 0xCAFEBABE"));
    }

    let minor_version = read_u16(&mut cursor, "minor_version")?;
    let major_version = read_u16(&mut cursor, "major_version")?;

    let constant_pool_count = read_u16(&mut cursor, "constant_pool_count")?;
    let constant_pool = read_constant_pool(&mut cursor, constant_pool_count).map_err(|e| {
        tracing::debug!(error = %e, "constant pool decode failed");
        e
    })?;

    let access_flags = ClassAccessFlags::from_u16(read_u16(&mut cursor, "access_flags")?);
    let this_class = read_u16(&mut cursor, "this_class")?;
    let super_class = read_u16(&mut cursor, "super_class")?;

    let interfaces_count = read_u16(&mut cursor, "interfaces_count")?;
    let mut interfaces = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        interfaces.push(read_u16(&mut cursor, "interfaces")?);
    }

    let fields_count = read_u16(&mut cursor, "fields_count")?;
    let fields = read_fields(&mut cursor, &constant_pool, fields_count)
        .map_err(|e| FormatError::new(FormatCause::Truncated { offset: cursor.position(), while_reading: "fields" }, e.to_string()))?;

    let methods_count = read_u16(&mut cursor, "methods_count")?;
    let methods = read_methods(&mut cursor, &constant_pool, methods_count)
        .map_err(|e| FormatError::new(FormatCause::Truncated { offset: cursor.position(), while_reading: "methods" }, e.to_string()))?;

    let attributes_count = read_u16(&mut cursor, "attributes_count")?;
    let attributes = read_attributes(&mut cursor, &constant_pool, attributes_count)
        .map_err(|e| FormatError::new(FormatCause::Truncated { offset: cursor.position(), while_reading: "class attributes" }, e.to_string()))?;

    let remaining = cursor.get_ref().len() as u64 - cursor.position();
    if remaining != 0 {
        return Err(FormatError::new(FormatCause::ExtraBytes, format!("{remaining} trailing bytes")));
    }

    Ok(Class {
        minor_version,
        major_version,
        constant_pool,
        access_flags,
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_class_bytes(magic: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(magic.to_be_bytes());
        bytes.extend(0u16.to_be_bytes()); // minor
        bytes.extend(52u16.to_be_bytes()); // major
        bytes.extend(1u16.to_be_bytes()); // constant_pool_count (empty pool)
        bytes.extend(0x0001u16.to_be_bytes()); // access_flags = ACC_PUBLIC
        bytes.extend(0u16.to_be_bytes()); // this_class
        bytes.extend(0u16.to_be_bytes()); // super_class
        bytes.extend(0u16.to_be_bytes()); // interfaces_count
        bytes.extend(0u16.to_be_bytes()); // fields_count
        bytes.extend(0u16.to_be_bytes()); // methods_count
        bytes.extend(0u16.to_be_bytes()); // attributes_count
        bytes
    }

    #[test]
    fn minimal_class_file_succeeds() {
        let bytes = minimal_class_bytes(MAGIC);
        let class = parse_class(&bytes).expect("minimal class file should parse");
        assert_eq!(class.major_version, 52);
        assert!(class.constant_pool.is_empty());
        assert!(class.fields.is_empty());
        assert!(class.methods.is_empty());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let bytes = minimal_class_bytes(0xDEAD_BEEF);
        let err = parse_class(&bytes).unwrap_err();
        assert!(matches!(err.cause, FormatCause::IncorrectMagic(0xDEAD_BEEF)));
    }

    #[test]
    fn truncated_header_is_a_structured_error_not_a_panic() {
        let bytes = [0xCA, 0xFE];
        let err = parse_class(&bytes).unwrap_err();
        assert!(matches!(err.cause, FormatCause::Truncated { .. }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = minimal_class_bytes(MAGIC);
        bytes.push(0xFF);
        let err = parse_class(&bytes).unwrap_err();
        assert!(matches!(err.cause, FormatCause::ExtraBytes));
    }
}
