use crate::types::{Literal, Ty};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

/// Parameter/return shape of a delegate type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<Ty>,
    pub ret: Ty,
}

impl Signature {
    pub fn new(params: Vec<Ty>, ret: Ty) -> Self {
        Self { params, ret }
    }

    pub fn substitute(&self, map: &HashMap<String, Ty>) -> Signature {
        Signature {
            params: self.params.iter().map(|p| p.substitute(map)).collect(),
            ret: self.ret.substitute(map),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub ty: Ty,
    /// Present for optional parameters.
    pub default: Option<Literal>,
    /// `params T[]` style variadic tail.
    pub is_params: bool,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            is_params: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: Ty, default: Literal) -> Self {
        Self {
            default: Some(default),
            ..Self::new(name, ty)
        }
    }

    /// Variadic tail parameter; `ty` is the array type.
    pub fn params(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            is_params: true,
            ..Self::new(name, ty)
        }
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    fn substitute(&self, map: &HashMap<String, Ty>) -> ParamInfo {
        ParamInfo {
            ty: self.ty.substitute(map),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    pub declaring: Ty,
    /// Generic parameters of a generic method definition.
    pub generic_params: Vec<String>,
    /// Arguments of a closed generic method; empty for definitions.
    pub generic_args: Vec<Ty>,
    pub params: Vec<ParamInfo>,
    pub ret: Ty,
    pub is_static: bool,
    pub is_extension: bool,
    pub visibility: Visibility,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, declaring: Ty, params: Vec<ParamInfo>, ret: Ty) -> Self {
        Self {
            name: name.into(),
            declaring,
            generic_params: vec![],
            generic_args: vec![],
            params,
            ret,
            is_static: false,
            is_extension: false,
            visibility: Visibility::Public,
        }
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Extension methods are static; their first parameter is the receiver.
    pub fn into_extension(mut self) -> Self {
        self.is_static = true;
        self.is_extension = true;
        self
    }

    pub fn with_generics(mut self, params: &[&str]) -> Self {
        self.generic_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params.is_empty() && self.generic_args.is_empty()
    }

    pub fn has_params_array(&self) -> bool {
        self.params.last().map(|p| p.is_params).unwrap_or(false)
    }

    /// Closes a generic method definition over `args` (one per generic parameter).
    pub fn make_generic(&self, args: &[Ty]) -> MethodInfo {
        let map: HashMap<String, Ty> = self
            .generic_params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        MethodInfo {
            generic_args: args.to_vec(),
            params: self.params.iter().map(|p| p.substitute(&map)).collect(),
            ret: self.ret.substitute(&map),
            ..self.clone()
        }
    }

    fn substitute(&self, map: &HashMap<String, Ty>) -> MethodInfo {
        MethodInfo {
            declaring: self.declaring.substitute(map),
            params: self.params.iter().map(|p| p.substitute(map)).collect(),
            ret: self.ret.substitute(map),
            ..self.clone()
        }
    }
}

impl Display for MethodInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.declaring, self.name)?;
        if !self.generic_args.is_empty() {
            write!(f, "<{}>", self.generic_args.iter().join(", "))?;
        } else if !self.generic_params.is_empty() {
            write!(f, "<{}>", self.generic_params.iter().join(", "))?;
        }
        write!(
            f,
            "({})",
            self.params.iter().map(|p| p.ty.to_string()).join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInfo {
    pub declaring: Ty,
    pub params: Vec<ParamInfo>,
    pub visibility: Visibility,
}

impl ConstructorInfo {
    pub fn new(declaring: Ty, params: Vec<ParamInfo>) -> Self {
        Self {
            declaring,
            params,
            visibility: Visibility::Public,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub declaring: Ty,
    pub ty: Ty,
    pub is_static: bool,
    /// Compile-time constant value, if the field is a constant.
    pub value: Option<Literal>,
    pub visibility: Visibility,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, declaring: Ty, ty: Ty) -> Self {
        Self {
            name: name.into(),
            declaring,
            ty,
            is_static: false,
            value: None,
            visibility: Visibility::Public,
        }
    }

    pub fn constant(name: impl Into<String>, declaring: Ty, value: Literal) -> Self {
        Self {
            is_static: true,
            ty: value.ty(),
            value: Some(value),
            ..Self::new(name, declaring, Ty::object())
        }
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub name: String,
    pub declaring: Ty,
    pub ty: Ty,
    /// Indexer parameters; empty for plain properties.
    pub index_params: Vec<ParamInfo>,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, declaring: Ty, ty: Ty) -> Self {
        Self {
            name: name.into(),
            declaring,
            ty,
            index_params: vec![],
            is_static: false,
            visibility: Visibility::Public,
        }
    }

    pub fn indexer(name: impl Into<String>, declaring: Ty, ty: Ty, params: Vec<ParamInfo>) -> Self {
        Self {
            index_params: params,
            ..Self::new(name, declaring, ty)
        }
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventInfo {
    pub name: String,
    pub declaring: Ty,
    /// Delegate type of the handlers.
    pub handler: Ty,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl EventInfo {
    pub fn new(name: impl Into<String>, declaring: Ty, handler: Ty) -> Self {
        Self {
            name: name.into(),
            declaring,
            handler,
            is_static: false,
            visibility: Visibility::Public,
        }
    }
}

/// A reflected member considered by dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldInfo),
    Property(PropertyInfo),
    Event(EventInfo),
    Method(MethodInfo),
    Constructor(ConstructorInfo),
    NestedType(Ty),
}

impl Member {
    /// Constructors have no name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Field(field) => Some(&field.name),
            Member::Property(prop) => Some(&prop.name),
            Member::Event(event) => Some(&event.name),
            Member::Method(method) => Some(&method.name),
            Member::Constructor(_) => None,
            Member::NestedType(ty) => Some(ty.name()),
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Field(field) => field.is_static,
            Member::Property(prop) => prop.is_static,
            Member::Event(event) => event.is_static,
            Member::Method(method) => method.is_static,
            Member::Constructor(_) | Member::NestedType(_) => true,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Member::Field(field) => field.visibility,
            Member::Property(prop) => prop.visibility,
            Member::Event(event) => event.visibility,
            Member::Method(method) => method.visibility,
            Member::Constructor(ctor) => ctor.visibility,
            Member::NestedType(_) => Visibility::Public,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility() == Visibility::Public
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, Member::Method(method) if method.is_extension)
    }

    /// Declared parameters: method/constructor parameters or indexer parameters.
    pub fn params(&self) -> &[ParamInfo] {
        match self {
            Member::Method(method) => &method.params,
            Member::Constructor(ctor) => &ctor.params,
            Member::Property(prop) => &prop.index_params,
            _ => &[],
        }
    }

    pub fn as_method(&self) -> Option<&MethodInfo> {
        match self {
            Member::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Member::Field(_) => "field",
            Member::Property(_) => "property",
            Member::Event(_) => "event",
            Member::Method(_) => "method",
            Member::Constructor(_) => "constructor",
            Member::NestedType(_) => "nested type",
        }
    }

    /// Rewrites the member as seen through a constructed generic type.
    pub fn substitute(&self, map: &HashMap<String, Ty>) -> Member {
        if map.is_empty() {
            return self.clone();
        }
        match self {
            Member::Field(field) => Member::Field(FieldInfo {
                declaring: field.declaring.substitute(map),
                ty: field.ty.substitute(map),
                ..field.clone()
            }),
            Member::Property(prop) => Member::Property(PropertyInfo {
                declaring: prop.declaring.substitute(map),
                ty: prop.ty.substitute(map),
                index_params: prop
                    .index_params
                    .iter()
                    .map(|p| p.substitute(map))
                    .collect(),
                ..prop.clone()
            }),
            Member::Event(event) => Member::Event(EventInfo {
                declaring: event.declaring.substitute(map),
                handler: event.handler.substitute(map),
                ..event.clone()
            }),
            Member::Method(method) => Member::Method(method.substitute(map)),
            Member::Constructor(ctor) => Member::Constructor(ConstructorInfo {
                declaring: ctor.declaring.substitute(map),
                params: ctor.params.iter().map(|p| p.substitute(map)).collect(),
                ..ctor.clone()
            }),
            Member::NestedType(ty) => Member::NestedType(ty.substitute(map)),
        }
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Member::Field(field) => write!(f, "{}.{}", field.declaring, field.name),
            Member::Property(prop) => write!(f, "{}.{}", prop.declaring, prop.name),
            Member::Event(event) => write!(f, "{}.{}", event.declaring, event.name),
            Member::Method(method) => write!(f, "{}", method),
            Member::Constructor(ctor) => write!(
                f,
                "new {}({})",
                ctor.declaring,
                ctor.params.iter().map(|p| p.ty.to_string()).join(", ")
            ),
            Member::NestedType(ty) => write!(f, "{}", ty),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    /// Static class: holds static and extension methods only.
    Static,
    Delegate(Signature),
}

/// Metadata for one (possibly generic) type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub generic_params: Vec<String>,
    pub kind: TypeKind,
    pub base: Option<Ty>,
    pub interfaces: Vec<Ty>,
    pub members: Vec<Member>,
    /// Name of the default (indexer) member.
    pub default_member: Option<String>,
}

impl TypeDef {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            generic_params: vec![],
            kind,
            base: None,
            interfaces: vec![],
            members: vec![],
            default_member: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }
    pub fn structure(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Struct)
    }
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }
    pub fn static_class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Static)
    }
    pub fn delegate(name: impl Into<String>, params: Vec<Ty>, ret: Ty) -> Self {
        Self::with_kind(name, TypeKind::Delegate(Signature::new(params, ret)))
    }

    pub fn with_generics(mut self, params: &[&str]) -> Self {
        self.generic_params = params.iter().map(|p| p.to_string()).collect();
        self
    }
    pub fn with_base(mut self, base: Ty) -> Self {
        self.base = Some(base);
        self
    }
    pub fn with_interface(mut self, interface: Ty) -> Self {
        self.interfaces.push(interface);
        self
    }
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
    pub fn with_members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.extend(members);
        self
    }
    pub fn with_default_member(mut self, name: impl Into<String>) -> Self {
        self.default_member = Some(name.into());
        self
    }

    /// The type as seen from inside its own definition (`List<T>`).
    pub fn self_ty(&self) -> Ty {
        Ty::generic(
            self.name.clone(),
            self.generic_params.iter().map(Ty::param).collect(),
        )
    }

    /// Registry key, see [`Ty::def_key`].
    pub fn key(&self) -> String {
        self.self_ty().def_key()
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct)
    }
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }
    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            TypeKind::Delegate(sig) => Some(sig),
            _ => None,
        }
    }

    /// Binds the definition's generic parameters to the arguments of `ty`.
    pub fn bindings_for(&self, ty: &Ty) -> HashMap<String, Ty> {
        self.generic_params
            .iter()
            .cloned()
            .zip(ty.type_args().iter().cloned())
            .collect()
    }
}
