use lx_core::types::{Literal, ParamInfo};
use lx_core::Node;

/// A call-site argument, named when written as `(: name value)`.
#[derive(Debug, Clone)]
pub(crate) struct Arg {
    pub name: Option<String>,
    pub value: Node,
}

impl Arg {
    pub fn positional(value: Node) -> Self {
        Self { name: None, value }
    }

    pub fn split(node: &Node) -> Self {
        match node.as_named_argument() {
            Some((name, value)) => Self {
                name: Some(name.to_string()),
                value: value.clone(),
            },
            None => Self::positional(node.clone()),
        }
    }
}

/// What fills one declared parameter.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Arg(Node),
    Default(Literal),
    /// Trailing arguments collected into the param array.
    Packed(Vec<Node>),
}

/// Declared parameters paired with the arguments filling them.
#[derive(Debug, Clone)]
pub(crate) struct ParamMap {
    pub slots: Vec<(ParamInfo, Slot)>,
    /// The param array is filled element-wise rather than by one array value.
    pub expanded: bool,
}

impl ParamMap {
    /// Pairs `params` with `args`, or `None` when they cannot line up.
    ///
    /// Positional arguments come first and fill parameters in order; named
    /// ones fill the parameter of that name. Unfilled optional parameters take
    /// their default. In the expanded form the param array takes every
    /// positional argument past the fixed parameters.
    pub fn build(params: &[ParamInfo], args: &[Arg], expanded: bool) -> Option<ParamMap> {
        if expanded && !params.last().map(|p| p.is_params).unwrap_or(false) {
            return None;
        }
        let positional = args.iter().take_while(|arg| arg.name.is_none()).count();
        if args[positional..].iter().any(|arg| arg.name.is_none()) {
            return None;
        }

        let fixed = if expanded { params.len() - 1 } else { params.len() };
        if !expanded && positional > fixed {
            return None;
        }
        let mut slots: Vec<Option<Slot>> = vec![None; params.len()];
        for (i, arg) in args[..positional.min(fixed)].iter().enumerate() {
            slots[i] = Some(Slot::Arg(arg.value.clone()));
        }
        if expanded {
            let packed = args[fixed.min(positional)..positional]
                .iter()
                .map(|arg| arg.value.clone())
                .collect();
            slots[fixed] = Some(Slot::Packed(packed));
        }

        for arg in &args[positional..] {
            let name = arg.name.as_deref()?;
            let index = params.iter().position(|p| p.name == name)?;
            if slots[index].is_some() {
                return None;
            }
            slots[index] = Some(Slot::Arg(arg.value.clone()));
        }

        let slots = params
            .iter()
            .zip(slots)
            .map(|(param, slot)| {
                let slot = slot.or_else(|| param.default.clone().map(Slot::Default))?;
                Some((param.clone(), slot))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(ParamMap { slots, expanded })
    }

    pub fn defaults(&self) -> usize {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Default(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lx_core::types::Ty;

    fn args(n: usize) -> Vec<Arg> {
        (0..n).map(|i| Arg::positional(Node::number(i.to_string()))).collect()
    }

    fn packed_len(map: &ParamMap) -> Option<usize> {
        match &map.slots.last()?.1 {
            Slot::Packed(items) => Some(items.len()),
            _ => None,
        }
    }

    #[test]
    fn arity_must_match_in_normal_form() {
        let params = vec![ParamInfo::new("a", Ty::int32())];
        assert!(ParamMap::build(&params, &args(1), false).is_some());
        assert!(ParamMap::build(&params, &args(2), false).is_none());
        assert!(ParamMap::build(&params, &args(0), false).is_none());
    }

    #[test]
    fn optional_parameters_take_defaults() {
        let params = vec![
            ParamInfo::new("a", Ty::int32()),
            ParamInfo::optional("b", Ty::int32(), Literal::Int32(7)),
        ];
        let map = ParamMap::build(&params, &args(1), false).unwrap();
        assert_eq!(map.defaults(), 1);
    }

    #[test]
    fn expanded_form_packs_trailing_arguments() {
        let params = vec![
            ParamInfo::new("sep", Ty::string()),
            ParamInfo::params("values", Ty::array(Ty::int32())),
        ];
        for n in [1, 2, 4] {
            let map = ParamMap::build(&params, &args(n), true).unwrap();
            assert_eq!(packed_len(&map), Some(n - 1));
        }
        assert!(ParamMap::build(&params, &args(0), true).is_none());
    }

    #[test]
    fn named_arguments_fill_by_name() {
        let params = vec![
            ParamInfo::new("a", Ty::int32()),
            ParamInfo::new("b", Ty::int32()),
        ];
        let mut call = args(1);
        call.push(Arg {
            name: Some("b".into()),
            value: Node::number("2"),
        });
        assert!(ParamMap::build(&params, &call, false).is_some());

        call.push(Arg {
            name: Some("a".into()),
            value: Node::number("3"),
        });
        assert!(ParamMap::build(&params, &call, false).is_none());
    }
}
