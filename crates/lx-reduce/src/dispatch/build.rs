use crate::dispatch::candidate::Candidate;
use lx_core::ast::{
    Call, EventSubscription, FieldAccess, NewObject, NodeKind, PropertyAccess,
};
use lx_core::error::Error;
use lx_core::types::well_known::IOBSERVABLE;
use lx_core::types::{EventInfo, Member, Ty};
use lx_core::{Node, Result, SymbolTable};

/// The typed expression for the selected candidate.
pub(crate) fn build(site: &Node, symbols: &SymbolTable, winner: Candidate) -> Result<Node> {
    let Candidate {
        member,
        instance,
        extension,
        args,
        ..
    } = winner;
    let span = site.span();
    let kind = match member {
        Member::Constructor(ctor) => NodeKind::New(NewObject { ctor, args }),
        Member::Field(field) => {
            if let (Some(value), true) = (&field.value, field.is_static) {
                return Ok(Node::typed_constant(value.clone(), field.ty.clone()));
            }
            NodeKind::Field(FieldAccess {
                instance: instance.filter(|_| !field.is_static),
                field,
            })
        }
        Member::Property(property) => NodeKind::Property(PropertyAccess {
            instance: instance.filter(|_| !property.is_static),
            property,
            args,
        }),
        Member::Event(event) => {
            if !symbols.config().reactive_events || !symbols.oracle().supports_event_adapter() {
                return Err(Error::MissingCapability(format!(
                    "reactive event adapter required to subscribe to {}",
                    event.name
                )));
            }
            let ty = observable_of(symbols, &event);
            NodeKind::EventSubscription(EventSubscription {
                instance: instance.filter(|_| !event.is_static),
                event,
                ty,
            })
        }
        Member::NestedType(ty) => return Ok(Node::type_candidate(vec![ty])),
        Member::Method(method) => NodeKind::Call(Call {
            instance: instance.filter(|_| !method.is_static && !extension),
            method,
            args,
        }),
    };
    Ok(Node::with_span(kind, span))
}

/// `IObservable<T>` where `T` is the handler's last parameter type.
fn observable_of(symbols: &SymbolTable, event: &EventInfo) -> Ty {
    let elem = symbols
        .oracle()
        .delegate_signature(&event.handler)
        .and_then(|sig| sig.params.last().cloned())
        .unwrap_or_else(Ty::object);
    Ty::generic(IOBSERVABLE, vec![elem])
}
