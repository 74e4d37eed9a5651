//! Field and method descriptors (JVMS §4.3.2, §4.3.3).
//!
//! The teacher's own descriptor parser drops array depth (`[[I` and `[I`
//! both come out as `FieldDescriptor::Int`) because it pushes an `ArrayType`
//! marker but never folds it into the element it precedes. This version
//! tracks `array_dims` explicitly so `[[I` round-trips as depth 2, not 1 or 0.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Void,
    Class(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub base: BaseType,
    pub array_dims: u8,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        match &self.base {
            BaseType::Byte => write!(f, "byte"),
            BaseType::Char => write!(f, "char"),
            BaseType::Double => write!(f, "double"),
            BaseType::Float => write!(f, "float"),
            BaseType::Int => write!(f, "int"),
            BaseType::Long => write!(f, "long"),
            BaseType::Short => write!(f, "short"),
            BaseType::Boolean => write!(f, "boolean"),
            BaseType::Void => write!(f, "void"),
            BaseType::Class(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: Option<FieldType>,
}

#[derive(Debug)]
pub struct DescriptorError {
    pub descriptor: String,
    pub msg: String,
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid descriptor \"{}\": {}", self.descriptor, self.msg)
    }
}

impl std::error::Error for DescriptorError {}

/// Parses one field-type element starting at `chars`, consuming it and
/// returning the parsed type. Shared by both field and method-parameter
/// descriptor parsing, since a parameter is just a field descriptor.
fn parse_field_type(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, whole: &str) -> Result<FieldType, DescriptorError> {
    let mut array_dims = 0u8;
    while let Some('[') = chars.peek() {
        chars.next();
        array_dims += 1;
    }
    let base = match chars.next() {
        Some('B') => BaseType::Byte,
        Some('C') => BaseType::Char,
        Some('D') => BaseType::Double,
        Some('F') => BaseType::Float,
        Some('I') => BaseType::Int,
        Some('J') => BaseType::Long,
        Some('S') => BaseType::Short,
        Some('Z') => BaseType::Boolean,
        Some('V') => BaseType::Void,
        Some('L') => {
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some(';') => break,
                    Some(c) => name.push(if c == '/' { '.' } else { c }),
                    None => {
                        return Err(DescriptorError { descriptor: whole.to_string(), msg: "unterminated class type, missing ';'".into() })
                    }
                }
            }
            BaseType::Class(name)
        }
        Some(other) => return Err(DescriptorError { descriptor: whole.to_string(), msg: format!("unexpected character '{other}'") }),
        None => return Err(DescriptorError { descriptor: whole.to_string(), msg: "unexpected end of descriptor".into() }),
    };
    Ok(FieldType { base, array_dims })
}

pub fn parse_field_descriptor(descriptor: &str) -> Result<FieldType, DescriptorError> {
    let mut chars = descriptor.chars().peekable();
    let ty = parse_field_type(&mut chars, descriptor)?;
    if chars.next().is_some() {
        return Err(DescriptorError { descriptor: descriptor.to_string(), msg: "trailing characters after field type".into() });
    }
    Ok(ty)
}

pub fn parse_method_descriptor(descriptor: &str) -> Result<MethodDescriptor, DescriptorError> {
    let mut chars = descriptor.chars().peekable();
    if chars.next() != Some('(') {
        return Err(DescriptorError { descriptor: descriptor.to_string(), msg: "method descriptor must start with '('".into() });
    }
    let mut params = Vec::new();
    loop {
        match chars.peek() {
            Some(')') => {
                chars.next();
                break;
            }
            Some(_) => params.push(parse_field_type(&mut chars, descriptor)?),
            None => return Err(DescriptorError { descriptor: descriptor.to_string(), msg: "unterminated parameter list".into() }),
        }
    }
    let return_type = match chars.peek() {
        Some('V') => {
            chars.next();
            None
        }
        Some(_) => Some(parse_field_type(&mut chars, descriptor)?),
        None => return Err(DescriptorError { descriptor: descriptor.to_string(), msg: "missing return type".into() }),
    };
    if chars.next().is_some() {
        return Err(DescriptorError { descriptor: descriptor.to_string(), msg: "trailing characters after return type".into() });
    }
    Ok(MethodDescriptor { params, return_type })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_depth_is_preserved() {
        let ty = parse_field_descriptor("[[I").unwrap();
        assert_eq!(ty.array_dims, 2);
        assert_eq!(ty.base, BaseType::Int);
    }

    #[test]
    fn class_type_normalizes_slashes_to_dots() {
        let ty = parse_field_descriptor("Ljava/lang/String;").unwrap();
        assert_eq!(ty.base, BaseType::Class("java.lang.String".to_string()));
    }

    #[test]
    fn method_descriptor_with_void_return() {
        let m = parse_method_descriptor("(ILjava/lang/String;)V").unwrap();
        assert_eq!(m.params.len(), 2);
        assert_eq!(m.return_type, None);
    }

    #[test]
    fn method_descriptor_with_array_return() {
        let m = parse_method_descriptor("()[[Ljava/lang/String;").unwrap();
        assert!(m.params.is_empty());
        let ret = m.return_type.unwrap();
        assert_eq!(ret.array_dims, 2);
    }
}
