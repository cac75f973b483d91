//! Match patterns: the constraint statements between `match` and the next
//! pipeline stage.

use super::common::{Literal, Var};

/// Right-hand side of a `has` constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum HasValue {
    Var(Var),
    Literal(Literal),
}

/// A role player inside a relation tuple; the role is optional, as in
/// `($page, $friend) isa friendship`.
#[derive(Debug, Clone, PartialEq)]
pub struct RolePlayer {
    pub role: Option<&'static str>,
    pub player: Var,
}

impl RolePlayer {
    pub fn new(role: &'static str, player: Var) -> Self {
        RolePlayer {
            role: Some(role),
            player,
        }
    }

    pub fn any_role(player: Var) -> Self {
        RolePlayer { role: None, player }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `$x isa person`
    Isa { var: Var, type_label: &'static str },
    /// `$x has name $name` or `$x has page-id "p1"`
    Has {
        var: Var,
        attribute: &'static str,
        value: HasValue,
    },
    /// `(page: $page, post: $post) isa posting`, or with a bound relation
    /// variable `$r isa reaction, links (parent: $post)`
    Links {
        relation_var: Option<Var>,
        relation: &'static str,
        players: Vec<RolePlayer>,
    },
    /// `let $ty = "person"`
    LetValue { var: Var, value: Literal },
    /// `let $child, $parent = parent_places_linked_list($place)`
    FunctionCall {
        outputs: Vec<Var>,
        function: &'static str,
        args: Vec<Var>,
    },
    /// `{ ... } or { ... }`
    Or(Vec<Pattern>),
}

impl Constraint {
    pub fn isa(var: &Var, type_label: &'static str) -> Self {
        Constraint::Isa {
            var: var.clone(),
            type_label,
        }
    }

    pub fn has_var(var: &Var, attribute: &'static str, value: &Var) -> Self {
        Constraint::Has {
            var: var.clone(),
            attribute,
            value: HasValue::Var(value.clone()),
        }
    }

    pub fn has_literal(var: &Var, attribute: &'static str, value: Literal) -> Self {
        Constraint::Has {
            var: var.clone(),
            attribute,
            value: HasValue::Literal(value),
        }
    }

    pub fn links(relation: &'static str, players: Vec<RolePlayer>) -> Self {
        Constraint::Links {
            relation_var: None,
            relation,
            players,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Constraint::Isa { var, type_label } => format!("{} isa {}", var, type_label),
            Constraint::Has {
                var,
                attribute,
                value,
            } => match value {
                HasValue::Var(v) => format!("{} has {} {}", var, attribute, v),
                HasValue::Literal(lit) => format!("{} has {} {}", var, attribute, lit),
            },
            Constraint::Links {
                relation_var,
                relation,
                players,
            } => {
                let tuple = players
                    .iter()
                    .map(|p| match p.role {
                        Some(role) => format!("{}: {}", role, p.player),
                        None => p.player.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                match relation_var {
                    Some(var) => format!("{} isa {}, links ({})", var, relation, tuple),
                    None => format!("({}) isa {}", tuple, relation),
                }
            }
            Constraint::LetValue { var, value } => format!("let {} = {}", var, value),
            Constraint::FunctionCall {
                outputs,
                function,
                args,
            } => format!(
                "let {} = {}({})",
                join_vars(outputs),
                function,
                join_vars(args)
            ),
            Constraint::Or(branches) => branches
                .iter()
                .map(|branch| format!("{{ {} }}", branch.render_inline()))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

fn join_vars(vars: &[Var]) -> String {
    vars.iter()
        .map(Var::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Conjunction of constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern(pub Vec<Constraint>);

impl Pattern {
    pub fn new() -> Self {
        Pattern(Vec::new())
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.0.push(constraint);
        self
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.0.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.0
    }

    /// One statement per constraint, each terminated with `;`.
    pub fn statements(&self) -> Vec<String> {
        self.0.iter().map(|c| format!("{};", c.render())).collect()
    }

    pub fn render_inline(&self) -> String {
        self.statements().join(" ")
    }
}
