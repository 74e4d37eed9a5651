//! `field_info` and `method_info` structures (JVMS §4.5, §4.6).

use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

use crate::access_flags::{FieldAccessFlags, MethodAccessFlags};
use crate::attributes::{read_attributes, AttributeInfo};
use crate::constants::{utf8_at, ConstantPoolEntry};
use crate::errors::AttributeError;
use crate::descriptors::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub access_flags: Vec<FieldAccessFlags>,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl FieldInfo {
    pub fn name<'a>(&self, pool: &'a [ConstantPoolEntry]) -> Option<&'a str> {
        utf8_at(pool, self.name_index)
    }

    pub fn descriptor<'a>(&self, pool: &'a [ConstantPoolEntry]) -> Option<&'a str> {
        utf8_at(pool, self.descriptor_index)
    }

    pub fn field_type(&self, pool: &[ConstantPoolEntry]) -> Option<FieldType> {
        self.descriptor(pool).and_then(|d| parse_field_descriptor(d).ok())
    }
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access_flags: Vec<MethodAccessFlags>,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl MethodInfo {
    pub fn name<'a>(&self, pool: &'a [ConstantPoolEntry]) -> Option<&'a str> {
        utf8_at(pool, self.name_index)
    }

    pub fn descriptor<'a>(&self, pool: &'a [ConstantPoolEntry]) -> Option<&'a str> {
        utf8_at(pool, self.descriptor_index)
    }

    pub fn method_descriptor(&self, pool: &[ConstantPoolEntry]) -> Option<MethodDescriptor> {
        self.descriptor(pool).and_then(|d| parse_method_descriptor(d).ok())
    }
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, AttributeError> {
    cursor.read_u16::<BE>().map_err(|_| AttributeError::new("<field_or_method>", "unexpected end of input"))
}

pub fn read_fields(cursor: &mut Cursor<&[u8]>, pool: &[ConstantPoolEntry], count: u16) -> Result<Vec<FieldInfo>, AttributeError> {
    let mut fields = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = FieldAccessFlags::from_u16(read_u16(cursor)?);
        let name_index = read_u16(cursor)?;
        let descriptor_index = read_u16(cursor)?;
        let attributes_count = read_u16(cursor)?;
        let attributes = read_attributes(cursor, pool, attributes_count)?;
        fields.push(FieldInfo { access_flags, name_index, descriptor_index, attributes });
    }
    Ok(fields)
}

pub fn read_methods(cursor: &mut Cursor<&[u8]>, pool: &[ConstantPoolEntry], count: u16) -> Result<Vec<MethodInfo>, AttributeError> {
    let mut methods = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = MethodAccessFlags::from_u16(read_u16(cursor)?);
        let name_index = read_u16(cursor)?;
        let descriptor_index = read_u16(cursor)?;
        let attributes_count = read_u16(cursor)?;
        let attributes = read_attributes(cursor, pool, attributes_count)?;
        methods.push(MethodInfo { access_flags, name_index, descriptor_index, attributes });
    }
    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_resolves_through_descriptor_index() {
        let pool = vec![ConstantPoolEntry::Utf8("count".into()), ConstantPoolEntry::Utf8("I".into())];
        let field = FieldInfo { access_flags: vec![], name_index: 1, descriptor_index: 2, attributes: vec![] };
        assert_eq!(field.name(&pool), Some("count"));
        assert!(field.field_type(&pool).is_some());
    }
}
