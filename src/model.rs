//! `ClassModel`: a cross-cutting, source-agnostic view of one type
//! declaration, lowered either from a decoded [`classfile::Class`] or from a
//! parsed source [`Node`]. Presentation only — encoders (JSON, line form,
//! Java pseudo-source) consume this; the pretty-printer never does.

use classfile::attributes::AttributeVariant;
use classfile::{Class, ConstantPoolEntry};

use crate::source::{Node, NodeKind, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    Module,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    PackagePrivate,
}

#[derive(Debug, Clone, Default)]
pub struct ModifierFlags {
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_non_sealed: bool,
    pub is_synchronized: bool,
    pub is_native: bool,
    pub is_transient: bool,
    pub is_volatile: bool,
    pub is_strictfp: bool,
    pub is_default: bool,
    pub is_synthetic: bool,
}

#[derive(Debug, Clone)]
pub struct AnnotationModel {
    pub type_name: String,
    /// `(element name, textual value)` pairs; empty for a marker annotation.
    pub elements: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct FieldModel {
    pub name: String,
    pub type_name: String,
    pub visibility: Visibility,
    pub modifiers: ModifierFlags,
    pub annotations: Vec<AnnotationModel>,
}

#[derive(Debug, Clone)]
pub struct ParameterModel {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<AnnotationModel>,
}

#[derive(Debug, Clone)]
pub struct MethodModel {
    pub name: String,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterModel>,
    pub visibility: Visibility,
    pub modifiers: ModifierFlags,
    pub annotations: Vec<AnnotationModel>,
}

#[derive(Debug, Clone)]
pub struct RecordComponentModel {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<AnnotationModel>,
}

#[derive(Debug, Clone)]
pub struct InnerClassModel {
    pub inner_name: Option<String>,
    pub outer_name: Option<String>,
    pub simple_name: Option<String>,
}

/// See §3.3: name, simple name, package, kind, visibility, modifier flags,
/// version (class-file origin only), signature, source-file hint,
/// fields/methods/record components/inner classes, permitted subclasses,
/// nest host/members, enclosing class, annotations.
#[derive(Debug, Clone)]
pub struct ClassModel {
    pub name: String,
    pub simple_name: String,
    pub package: Option<String>,
    pub kind: ModelKind,
    pub visibility: Visibility,
    pub modifiers: ModifierFlags,
    pub version: Option<(u16, u16)>,
    pub signature: Option<String>,
    pub source_file: Option<String>,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldModel>,
    pub methods: Vec<MethodModel>,
    pub record_components: Vec<RecordComponentModel>,
    pub inner_classes: Vec<InnerClassModel>,
    pub permitted_subclasses: Vec<String>,
    pub nest_host: Option<String>,
    pub nest_members: Vec<String>,
    pub enclosing_class: Option<String>,
    pub annotations: Vec<AnnotationModel>,
}

fn split_name(qualified: &str) -> (Option<String>, String) {
    match qualified.rfind('.') {
        Some(idx) => (Some(qualified[..idx].to_string()), qualified[idx + 1..].to_string()),
        None => (None, qualified.to_string()),
    }
}

impl ClassModel {
    /// Lowers a decoded class file into a presentation model. Best-effort:
    /// a constant-pool index that fails to resolve yields a neutral
    /// placeholder rather than aborting, matching `classfile`'s own
    /// "never abort on a dangling index" rule (§4.5).
    pub fn from_class(class: &Class) -> ClassModel {
        let pool = &class.constant_pool;
        let qualified = class.this_class_name().unwrap_or("<unknown>").replace('/', ".");
        let (package, simple_name) = split_name(&qualified);

        let is_interface = class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccInterface);
        let is_annotation = class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccAnnotation);
        let is_enum = class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccEnum);
        let is_module = class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccModule);
        let has_record_attr = class.attributes.iter().any(|a| matches!(a.variant, AttributeVariant::Record(_)));

        let kind = if is_module {
            ModelKind::Module
        } else if is_annotation {
            ModelKind::Annotation
        } else if has_record_attr {
            ModelKind::Record
        } else if is_enum {
            ModelKind::Enum
        } else if is_interface {
            ModelKind::Interface
        } else {
            ModelKind::Class
        };

        let visibility = if class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccPublic) {
            Visibility::Public
        } else {
            Visibility::PackagePrivate
        };

        let modifiers = ModifierFlags {
            is_final: class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccFinal),
            is_abstract: class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccAbstract),
            is_synthetic: class.access_flags.iter().any(|f| *f == classfile::access_flags::ClassAccessFlags::AccSynthetic),
            ..Default::default()
        };

        let mut signature = None;
        let mut source_file = None;
        let mut nest_host = None;
        let mut nest_members = Vec::new();
        let mut permitted_subclasses = Vec::new();
        let mut inner_classes = Vec::new();
        let mut record_components = Vec::new();
        let mut annotations = Vec::new();
        let mut enclosing_class = None;

        for attr in &class.attributes {
            match &attr.variant {
                AttributeVariant::Signature { signature_index } => {
                    signature = classfile::constants::utf8_at(pool, *signature_index).map(str::to_string);
                }
                AttributeVariant::SourceFile { sourcefile_index } => {
                    source_file = classfile::constants::utf8_at(pool, *sourcefile_index).map(str::to_string);
                }
                AttributeVariant::EnclosingMethod { class_index, .. } => {
                    enclosing_class = class_name_at(pool, *class_index);
                }
                AttributeVariant::NestHost { host_class_index } => {
                    nest_host = class_name_at(pool, *host_class_index);
                }
                AttributeVariant::NestMembers(indices) => {
                    nest_members = indices.iter().filter_map(|i| class_name_at(pool, *i)).collect();
                }
                AttributeVariant::PermittedSubclasses(indices) => {
                    permitted_subclasses = indices.iter().filter_map(|i| class_name_at(pool, *i)).collect();
                }
                AttributeVariant::InnerClasses(entries) => {
                    inner_classes = entries
                        .iter()
                        .map(|e| InnerClassModel {
                            inner_name: class_name_at(pool, e.inner_class_info_index),
                            outer_name: if e.outer_class_info_index == 0 { None } else { class_name_at(pool, e.outer_class_info_index) },
                            simple_name: if e.inner_name_index == 0 {
                                None
                            } else {
                                classfile::constants::utf8_at(pool, e.inner_name_index).map(str::to_string)
                            },
                        })
                        .collect();
                }
                AttributeVariant::Record(components) => {
                    record_components = components
                        .iter()
                        .map(|c| RecordComponentModel {
                            name: classfile::constants::utf8_at(pool, c.name_index).unwrap_or("").to_string(),
                            type_name: classfile::constants::utf8_at(pool, c.descriptor_index)
                                .and_then(|d| classfile::descriptors::parse_field_descriptor(d).ok())
                                .map(|t| t.to_string())
                                .unwrap_or_default(),
                            annotations: annotations_from(pool, &c.attributes),
                        })
                        .collect();
                }
                AttributeVariant::RuntimeVisibleAnnotations(list) | AttributeVariant::RuntimeInvisibleAnnotations(list) => {
                    annotations.extend(list.iter().map(|a| annotation_model(pool, a)));
                }
                _ => {}
            }
        }

        let fields = class
            .fields
            .iter()
            .map(|f| FieldModel {
                name: f.name(pool).unwrap_or("").to_string(),
                type_name: f.field_type(pool).map(|t| t.to_string()).unwrap_or_default(),
                visibility: field_visibility(&f.access_flags),
                modifiers: field_modifiers(&f.access_flags),
                annotations: attribute_annotations(pool, &f.attributes),
            })
            .collect();

        let methods = class
            .methods
            .iter()
            .map(|m| {
                let descriptor = m.method_descriptor(pool);
                let parameter_annotations = parameter_annotations_by_index(pool, &m.attributes);
                MethodModel {
                    name: m.name(pool).unwrap_or("").to_string(),
                    return_type: descriptor.as_ref().and_then(|d| d.return_type.as_ref()).map(|t| t.to_string()),
                    parameters: descriptor
                        .map(|d| {
                            d.params
                                .iter()
                                .enumerate()
                                .map(|(i, p)| ParameterModel {
                                    name: format!("arg{i}"),
                                    type_name: p.to_string(),
                                    annotations: parameter_annotations.get(i).cloned().unwrap_or_default(),
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                    visibility: method_visibility(&m.access_flags),
                    modifiers: method_modifiers(&m.access_flags),
                    annotations: attribute_annotations(pool, &m.attributes),
                }
            })
            .collect();

        ClassModel {
            name: qualified,
            simple_name,
            package,
            kind,
            visibility,
            modifiers,
            version: Some((class.major_version, class.minor_version)),
            signature,
            source_file,
            super_class: class.super_class_name().map(|n| n.replace('/', ".")),
            interfaces: class.interface_names().into_iter().map(|n| n.replace('/', ".")).collect(),
            fields,
            methods,
            record_components,
            inner_classes,
            permitted_subclasses,
            nest_host,
            nest_members,
            enclosing_class,
            annotations,
        }
    }

    /// Lowers a parsed source `Node` tree (a single type declaration, or a
    /// `CompilationUnit` wrapping one) into the same presentation model.
    /// `tokens` is unused by the current lowering (every value needed is
    /// already carried on node leaves) but is accepted per the interface
    /// in SPEC_FULL.md so a future caller building byte offsets back into
    /// the original source has it in hand.
    pub fn from_node(node: &Node, _tokens: &[Token]) -> Option<ClassModel> {
        let type_decl = find_type_decl(node)?;

        let kind = match type_decl.kind {
            NodeKind::ClassDecl => ModelKind::Class,
            NodeKind::InterfaceDecl => ModelKind::Interface,
            NodeKind::EnumDecl => ModelKind::Enum,
            NodeKind::RecordDecl => ModelKind::Record,
            NodeKind::AnnotationDecl => ModelKind::Annotation,
            NodeKind::ModuleDecl => ModelKind::Module,
            _ => return None,
        };

        let package = find_package(node);
        let simple_name = type_decl.children.iter().find(|c| c.kind == NodeKind::Identifier).and_then(leaf_text).unwrap_or_default();
        let name = match &package {
            Some(pkg) => format!("{pkg}.{simple_name}"),
            None => simple_name.clone(),
        };

        let modifiers_node = type_decl.children.iter().find(|c| c.kind == NodeKind::Modifiers);
        let (visibility, modifiers) = modifiers_node.map(lower_modifiers).unwrap_or((Visibility::PackagePrivate, ModifierFlags::default()));
        let annotations = modifiers_node.map(lower_annotations).unwrap_or_default();

        let mut super_class = None;
        let mut interfaces = Vec::new();
        let mut permitted_subclasses = Vec::new();
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut record_components = Vec::new();

        for child in &type_decl.children {
            match child.kind {
                NodeKind::ExtendsClause => {
                    let names: Vec<String> = child.children.iter().filter_map(type_node_name).collect();
                    if kind == ModelKind::Interface {
                        interfaces = names;
                    } else {
                        super_class = names.into_iter().next();
                    }
                }
                NodeKind::ImplementsClause => {
                    interfaces = child.children.iter().filter_map(type_node_name).collect();
                }
                NodeKind::PermitsClause => {
                    permitted_subclasses = child.children.iter().filter_map(type_node_name).collect();
                }
                NodeKind::Parameters if kind == ModelKind::Record => {
                    record_components = child
                        .children
                        .iter()
                        .filter(|c| c.kind == NodeKind::Parameter)
                        .map(|p| RecordComponentModel {
                            name: p.children.iter().find(|c| c.kind == NodeKind::Identifier).and_then(leaf_text).unwrap_or_default(),
                            type_name: p.children.iter().find_map(type_node_name).unwrap_or_default(),
                            annotations: Vec::new(),
                        })
                        .collect();
                }
                NodeKind::FieldDecl => fields.extend(lower_field_decl(child)),
                NodeKind::MethodDecl => methods.push(lower_method_decl(child)),
                _ => {}
            }
        }

        Some(ClassModel {
            name,
            simple_name,
            package,
            kind,
            visibility,
            modifiers,
            version: None,
            signature: None,
            source_file: None,
            super_class,
            interfaces,
            fields,
            methods,
            record_components,
            inner_classes: Vec::new(),
            permitted_subclasses,
            nest_host: None,
            nest_members: Vec::new(),
            // `find_type_decl` always returns the outermost declaration it
            // reaches (a direct `CompilationUnit` child, or `node` itself),
            // and `Node` carries no parent link — so there is never an
            // ancestor type to report here. A nested class only gets a
            // non-`None` enclosing class via `from_class`, where the
            // class-file format encodes it explicitly per `EnclosingMethod`.
            enclosing_class: None,
            annotations,
        })
    }
}

fn find_type_decl(node: &Node) -> Option<&Node> {
    if matches!(
        node.kind,
        NodeKind::ClassDecl | NodeKind::InterfaceDecl | NodeKind::EnumDecl | NodeKind::RecordDecl | NodeKind::AnnotationDecl | NodeKind::ModuleDecl
    ) {
        return Some(node);
    }
    if node.kind == NodeKind::CompilationUnit {
        return node.children.iter().find(|c| {
            matches!(
                c.kind,
                NodeKind::ClassDecl | NodeKind::InterfaceDecl | NodeKind::EnumDecl | NodeKind::RecordDecl | NodeKind::AnnotationDecl | NodeKind::ModuleDecl
            )
        });
    }
    None
}

fn find_package(node: &Node) -> Option<String> {
    let unit = if node.kind == NodeKind::CompilationUnit { node } else { return None };
    let pkg = unit.children.iter().find(|c| c.kind == NodeKind::PackageDecl)?;
    let qn = pkg.children.iter().find(|c| c.kind == NodeKind::QualifiedName)?;
    Some(qualified_name_text(qn))
}

fn qualified_name_text(qn: &Node) -> String {
    qn.children.iter().filter_map(leaf_text).collect::<Vec<_>>().join(".")
}

fn leaf_text(node: &Node) -> Option<String> {
    node.token.as_ref().map(|t| t.text.clone())
}

/// Best-effort textual rendering of a `Type` node's name, ignoring type
/// arguments and array suffixes (the model's fields are display strings,
/// not a type-argument-aware structure).
fn type_node_name(node: &Node) -> Option<String> {
    match node.kind {
        NodeKind::Type | NodeKind::ParameterizedType | NodeKind::ArrayType => {
            node.children.iter().find_map(type_node_name).or_else(|| node.token.as_ref().map(|t| t.text.clone()))
        }
        NodeKind::QualifiedName => Some(qualified_name_text(node)),
        NodeKind::Identifier => leaf_text(node),
        _ => None,
    }
}

fn lower_modifiers(modifiers: &Node) -> (Visibility, ModifierFlags) {
    let mut visibility = Visibility::PackagePrivate;
    let mut flags = ModifierFlags::default();
    for child in &modifiers.children {
        let Some(text) = leaf_text(child) else { continue };
        match text.as_str() {
            "public" => visibility = Visibility::Public,
            "protected" => visibility = Visibility::Protected,
            "private" => visibility = Visibility::Private,
            "static" => flags.is_static = true,
            "final" => flags.is_final = true,
            "abstract" => flags.is_abstract = true,
            "sealed" => flags.is_sealed = true,
            "non" => flags.is_non_sealed = true,
            "synchronized" => flags.is_synchronized = true,
            "native" => flags.is_native = true,
            "transient" => flags.is_transient = true,
            "volatile" => flags.is_volatile = true,
            "strictfp" => flags.is_strictfp = true,
            "default" => flags.is_default = true,
            _ => {}
        }
    }
    (visibility, flags)
}

fn lower_annotations(modifiers: &Node) -> Vec<AnnotationModel> {
    modifiers
        .children
        .iter()
        .filter(|c| c.kind == NodeKind::Annotation)
        .map(|a| {
            let type_name = a.children.first().map(qualified_name_text).unwrap_or_default();
            let elements = a
                .children
                .iter()
                .skip(1)
                .filter(|c| c.kind == NodeKind::AnnotationElement)
                .map(|el| {
                    let name = el.children.first().and_then(leaf_text).unwrap_or_default();
                    let value = el.children.get(1).map(describe_node).unwrap_or_default();
                    (name, value)
                })
                .collect();
            AnnotationModel { type_name, elements }
        })
        .collect()
}

/// A short, non-exhaustive text rendering for an annotation element value;
/// good enough for encoders that just need something to display.
fn describe_node(node: &Node) -> String {
    match node.kind {
        NodeKind::Literal => node.token.as_ref().map(|t| t.text.clone()).unwrap_or_default(),
        NodeKind::Identifier | NodeKind::QualifiedName => node.token.as_ref().map(|t| t.text.clone()).unwrap_or_else(|| qualified_name_text(node)),
        _ => format!("{:?}", node.kind),
    }
}

fn lower_field_decl(field: &Node) -> Vec<FieldModel> {
    if field.children.len() < 2 {
        return Vec::new();
    }
    let (visibility, modifiers) = lower_modifiers(&field.children[0]);
    let annotations = lower_annotations(&field.children[0]);
    let type_name = type_node_name(&field.children[1]).unwrap_or_default();
    field.children[2..]
        .iter()
        .filter(|c| c.kind == NodeKind::Identifier)
        .filter_map(leaf_text)
        .map(|name| FieldModel { name, type_name: type_name.clone(), visibility, modifiers: modifiers.clone(), annotations: annotations.clone() })
        .collect()
}

fn lower_method_decl(method: &Node) -> MethodModel {
    let (visibility, modifiers) = method.children.first().map(lower_modifiers).unwrap_or((Visibility::PackagePrivate, ModifierFlags::default()));
    let annotations = method.children.first().map(lower_annotations).unwrap_or_default();
    let return_type = method.children.iter().find(|c| matches!(c.kind, NodeKind::Type | NodeKind::ArrayType)).and_then(type_node_name);
    let name = method.children.iter().find(|c| c.kind == NodeKind::Identifier).and_then(leaf_text).unwrap_or_default();
    let parameters = method
        .children
        .iter()
        .find(|c| c.kind == NodeKind::Parameters)
        .map(|params| {
            params
                .children
                .iter()
                .filter(|c| c.kind == NodeKind::Parameter)
                .map(|p| ParameterModel {
                    name: p.children.iter().rev().find_map(leaf_text).unwrap_or_default(),
                    type_name: p.children.iter().find_map(type_node_name).unwrap_or_default(),
                    annotations: Vec::new(),
                })
                .collect()
        })
        .unwrap_or_default();
    MethodModel {
        name,
        return_type: if return_type.as_deref() == Some("void") { None } else { return_type },
        parameters,
        visibility,
        modifiers,
        annotations,
    }
}

fn class_name_at(pool: &[ConstantPoolEntry], index: u16) -> Option<String> {
    match classfile::constants::pool_get(pool, index) {
        Some(ConstantPoolEntry::Class { name_index }) => classfile::constants::utf8_at(pool, *name_index).map(|s| s.replace('/', ".")),
        _ => None,
    }
}

fn annotations_from(pool: &[ConstantPoolEntry], attributes: &[classfile::attributes::AttributeInfo]) -> Vec<AnnotationModel> {
    attribute_annotations(pool, attributes)
}

fn attribute_annotations(pool: &[ConstantPoolEntry], attributes: &[classfile::attributes::AttributeInfo]) -> Vec<AnnotationModel> {
    let mut out = Vec::new();
    for attr in attributes {
        match &attr.variant {
            AttributeVariant::RuntimeVisibleAnnotations(list) | AttributeVariant::RuntimeInvisibleAnnotations(list) => {
                out.extend(list.iter().map(|a| annotation_model(pool, a)));
            }
            _ => {}
        }
    }
    out
}

/// Merges `RuntimeVisible`/`RuntimeInvisibleParameterAnnotations` into one
/// list of annotation lists indexed by formal-parameter position.
fn parameter_annotations_by_index(pool: &[ConstantPoolEntry], attributes: &[classfile::attributes::AttributeInfo]) -> Vec<Vec<AnnotationModel>> {
    let mut by_index: Vec<Vec<AnnotationModel>> = Vec::new();
    for attr in attributes {
        let entries = match &attr.variant {
            AttributeVariant::RuntimeVisibleParameterAnnotations(entries) | AttributeVariant::RuntimeInvisibleParameterAnnotations(entries) => entries,
            _ => continue,
        };
        if by_index.len() < entries.len() {
            by_index.resize(entries.len(), Vec::new());
        }
        for (i, entry) in entries.iter().enumerate() {
            by_index[i].extend(entry.annotations.iter().map(|a| annotation_model(pool, a)));
        }
    }
    by_index
}

fn annotation_model(pool: &[ConstantPoolEntry], annotation: &classfile::attributes::Annotation) -> AnnotationModel {
    let type_name = classfile::constants::utf8_at(pool, annotation.type_index)
        .map(|d| d.trim_start_matches('L').trim_end_matches(';').replace('/', "."))
        .unwrap_or_default();
    let elements = annotation
        .element_value_pairs
        .iter()
        .map(|pair| {
            let name = classfile::constants::utf8_at(pool, pair.element_name_index).unwrap_or("").to_string();
            (name, describe_element_value(pool, &pair.value))
        })
        .collect();
    AnnotationModel { type_name, elements }
}

fn describe_element_value(pool: &[ConstantPoolEntry], value: &classfile::attributes::ElementValue) -> String {
    use classfile::attributes::ElementValuePayload;
    match &value.payload {
        ElementValuePayload::ConstValueIndex(idx) => {
            classfile::constants::pool_get(pool, *idx).map(|e| e.utf8_value().map(str::to_string).unwrap_or_else(|| format!("{e:?}"))).unwrap_or_default()
        }
        ElementValuePayload::EnumConstValue { const_name_index, .. } => classfile::constants::utf8_at(pool, *const_name_index).unwrap_or("").to_string(),
        ElementValuePayload::ClassInfoIndex(idx) => classfile::constants::utf8_at(pool, *idx).unwrap_or("").to_string(),
        ElementValuePayload::AnnotationValue(a) => annotation_model(pool, a).type_name,
        ElementValuePayload::ArrayValue(values) => format!("[{} values]", values.len()),
    }
}

fn field_visibility(flags: &[classfile::access_flags::FieldAccessFlags]) -> Visibility {
    use classfile::access_flags::FieldAccessFlags::*;
    if flags.contains(&AccPublic) {
        Visibility::Public
    } else if flags.contains(&AccProtected) {
        Visibility::Protected
    } else if flags.contains(&AccPrivate) {
        Visibility::Private
    } else {
        Visibility::PackagePrivate
    }
}

fn field_modifiers(flags: &[classfile::access_flags::FieldAccessFlags]) -> ModifierFlags {
    use classfile::access_flags::FieldAccessFlags::*;
    ModifierFlags {
        is_static: flags.contains(&AccStatic),
        is_final: flags.contains(&AccFinal),
        is_transient: flags.contains(&AccTransient),
        is_volatile: flags.contains(&AccVolatile),
        is_synthetic: flags.contains(&AccSynthetic),
        ..Default::default()
    }
}

fn method_visibility(flags: &[classfile::access_flags::MethodAccessFlags]) -> Visibility {
    use classfile::access_flags::MethodAccessFlags::*;
    if flags.contains(&AccPublic) {
        Visibility::Public
    } else if flags.contains(&AccProtected) {
        Visibility::Protected
    } else if flags.contains(&AccPrivate) {
        Visibility::Private
    } else {
        Visibility::PackagePrivate
    }
}

fn method_modifiers(flags: &[classfile::access_flags::MethodAccessFlags]) -> ModifierFlags {
    use classfile::access_flags::MethodAccessFlags::*;
    ModifierFlags {
        is_static: flags.contains(&AccStatic),
        is_final: flags.contains(&AccFinal),
        is_abstract: flags.contains(&AccAbstract),
        is_synchronized: flags.contains(&AccSynchronized),
        is_native: flags.contains(&AccNative),
        is_strictfp: flags.contains(&AccStrict),
        is_synthetic: flags.contains(&AccSynthetic),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parser::{parse_source, ParserOptions};

    #[test]
    fn lowers_a_simple_class_declaration() {
        let src = b"package com.example;\npublic final class Widget extends Base implements Runnable {\n    private int count;\n    public int get() { return count; }\n}\n";
        let result = parse_source(src, Some("Widget.java"), ParserOptions::default());
        let model = ClassModel::from_node(&result.tree, &[]).expect("should lower");
        assert_eq!(model.name, "com.example.Widget");
        assert_eq!(model.kind, ModelKind::Class);
        assert_eq!(model.visibility, Visibility::Public);
        assert!(model.modifiers.is_final);
        assert_eq!(model.super_class.as_deref(), Some("Base"));
        assert_eq!(model.interfaces, vec!["Runnable".to_string()]);
        assert_eq!(model.fields.len(), 1);
        assert_eq!(model.fields[0].name, "count");
        assert_eq!(model.methods.len(), 1);
        assert_eq!(model.methods[0].name, "get");
    }

    #[test]
    fn lowers_record_components() {
        let src = b"record Point(int x, int y) {}\n";
        let result = parse_source(src, Some("Point.java"), ParserOptions::default());
        let model = ClassModel::from_node(&result.tree, &[]).expect("should lower");
        assert_eq!(model.kind, ModelKind::Record);
        assert_eq!(model.record_components.len(), 2);
        assert_eq!(model.record_components[0].name, "x");
        assert_eq!(model.record_components[1].name, "y");
    }
}
