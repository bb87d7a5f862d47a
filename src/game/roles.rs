use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Don,
    Traitor,
    Capo,
    FbiAgent,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Don => "Don",
            Role::Traitor => "Traitor",
            Role::Capo => "Capo",
            Role::FbiAgent => "FBI Agent",
        }
    }
}

/// Fixed role multiset per player count. Unsupported counts return an
/// empty set; callers must treat that as "role distribution unsupported"
/// rather than panic.
pub fn roles_for_count(count: usize) -> Vec<Role> {
    match count {
        4 => vec![Role::Don, Role::Traitor, Role::FbiAgent, Role::FbiAgent],
        5 => vec![
            Role::Don,
            Role::Traitor,
            Role::Capo,
            Role::FbiAgent,
            Role::FbiAgent,
        ],
        6 => vec![
            Role::Don,
            Role::Traitor,
            Role::Capo,
            Role::FbiAgent,
            Role::FbiAgent,
            Role::FbiAgent,
        ],
        7 => vec![
            Role::Don,
            Role::Traitor,
            Role::Capo,
            Role::Capo,
            Role::FbiAgent,
            Role::FbiAgent,
            Role::FbiAgent,
        ],
        _ => Vec::new(),
    }
}

/// Role visibility: the Don is public, everyone knows their own role,
/// and the Don additionally knows who the Capos are.
pub fn role_visible_to(viewer_role: Option<Role>, subject_role: Role, is_self: bool) -> bool {
    if subject_role == Role::Don {
        return true;
    }
    if is_self {
        return true;
    }
    matches!((viewer_role, subject_role), (Some(Role::Don), Role::Capo))
}
