//! Scope records for binding-conflict detection, plus label tracking.
//!
//! Each function-parsing call owns a slice of the scope stack; `var`
//! declarations walk up to the nearest function boundary, registering the
//! name in every scope they pass so later lexical declarations see them.
//! All records are discarded when the enclosing construct finishes
//! parsing; nothing survives a parse call.

use rustc_hash::FxHashMap;

/// What kind of declaration bound a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    CatchParam,
    Parameter,
    Import,
}

/// The kind of a scope on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Program or function body: bounds the `var` hoisting walk.
    Function,
    /// Block, switch block, or for-statement head.
    Block,
    /// Catch clause: params and body share this scope. `simple` is true
    /// for a plain identifier parameter (annex-B `var` tolerance).
    Catch { simple: bool },
}

/// One lexical scope: block-scoped names plus the `var` names that have
/// been registered while hoisting through this scope.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    lexical: FxHashMap<String, BindingKind>,
    var: FxHashMap<String, BindingKind>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            lexical: FxHashMap::default(),
            var: FxHashMap::default(),
        }
    }
}

/// A conflicting redeclaration, reported with the offending name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConflict {
    pub name: String,
}

/// The scope stack owned by one parse call.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn current(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack underflow")
    }

    /// Declare a `var` (or top-level function) binding: walk from the
    /// innermost scope to the nearest function boundary, checking lexical
    /// conflicts and registering the name at every step.
    ///
    /// Conflict exceptions, mirroring hoisting semantics:
    /// - formal parameters of the enclosing function never conflict;
    /// - a simple-identifier catch parameter tolerates `var` of the same
    ///   name (annex B) when web compat is on;
    /// - a block-level function declaration tolerates `var` in sloppy
    ///   web-compat mode (annex B).
    pub fn declare_var(
        &mut self,
        name: &str,
        strict: bool,
        web_compat: bool,
    ) -> Result<(), BindingConflict> {
        for index in (0..self.scopes.len()).rev() {
            let scope = &self.scopes[index];
            if let Some(&existing) = scope.lexical.get(name) {
                let tolerated = match existing {
                    BindingKind::Parameter => true,
                    BindingKind::CatchParam => {
                        matches!(scope.kind, ScopeKind::Catch { simple: true }) && web_compat
                    }
                    BindingKind::Function => {
                        matches!(scope.kind, ScopeKind::Block) && !strict && web_compat
                    }
                    _ => false,
                };
                if !tolerated {
                    return Err(BindingConflict { name: name.to_string() });
                }
            }
            self.scopes[index]
                .var
                .insert(name.to_string(), BindingKind::Var);
            if matches!(self.scopes[index].kind, ScopeKind::Function) {
                break;
            }
        }
        Ok(())
    }

    /// Declare a lexical (`let`/`const`/`class`/import/function-in-block)
    /// binding in the current scope.
    ///
    /// Duplicate block-level function declarations are tolerated in
    /// sloppy web-compat mode (annex B); everything else conflicts with
    /// any lexical or hoisted-var name already in this scope.
    pub fn declare_lexical(
        &mut self,
        name: &str,
        kind: BindingKind,
        strict: bool,
        web_compat: bool,
    ) -> Result<(), BindingConflict> {
        let scope = self.current();
        if let Some(&existing) = scope.lexical.get(name) {
            let tolerated = existing == BindingKind::Function
                && kind == BindingKind::Function
                && matches!(scope.kind, ScopeKind::Block)
                && !strict
                && web_compat;
            if !tolerated {
                return Err(BindingConflict { name: name.to_string() });
            }
        }
        if scope.var.contains_key(name) {
            return Err(BindingConflict { name: name.to_string() });
        }
        scope.lexical.insert(name.to_string(), kind);
        Ok(())
    }

    /// Declare a formal parameter in the current (function or catch)
    /// scope. Duplicate parameters are legal in some lists; the caller
    /// enforces that separately, so no conflict check happens here.
    pub fn declare_parameter(&mut self, name: &str, kind: BindingKind) {
        self.current().lexical.insert(name.to_string(), kind);
    }

    /// The kind of the innermost scope.
    pub fn current_kind(&self) -> Option<ScopeKind> {
        self.scopes.last().map(|s| s.kind)
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Resolution result for a `continue` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueTarget {
    Found,
    NotIteration,
    NotFound,
}

#[derive(Debug)]
struct LabelEntry {
    name: String,
    iteration: bool,
    function_depth: u32,
}

/// Active label set, segmented per enclosing function.
#[derive(Debug, Default)]
pub struct LabelTracker {
    labels: Vec<LabelEntry>,
    function_depth: u32,
}

impl LabelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a function body: labels of the caller go out of reach.
    pub fn enter_function(&mut self) {
        self.function_depth += 1;
    }

    pub fn exit_function(&mut self) {
        self.function_depth -= 1;
    }

    /// Declare a label; fails on a duplicate active label in the same
    /// function.
    pub fn push(&mut self, name: &str, iteration: bool) -> Result<(), ()> {
        if self
            .labels
            .iter()
            .any(|l| l.function_depth == self.function_depth && l.name == name)
        {
            return Err(());
        }
        self.labels.push(LabelEntry {
            name: name.to_string(),
            iteration,
            function_depth: self.function_depth,
        });
        Ok(())
    }

    pub fn pop(&mut self) {
        self.labels.pop();
    }

    /// Resolve a `break <label>`: the label must be active in this
    /// function.
    pub fn resolve_break(&self, name: &str) -> bool {
        self.labels
            .iter()
            .any(|l| l.function_depth == self.function_depth && l.name == name)
    }

    /// Resolve a `continue <label>`: the label must be active in this
    /// function and denote an iteration statement.
    pub fn resolve_continue(&self, name: &str) -> ContinueTarget {
        match self
            .labels
            .iter()
            .rev()
            .find(|l| l.function_depth == self.function_depth && l.name == name)
        {
            Some(entry) if entry.iteration => ContinueTarget::Found,
            Some(_) => ContinueTarget::NotIteration,
            None => ContinueTarget::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_with_function_scope() -> ScopeStack {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Function);
        scopes
    }

    #[test]
    fn test_var_then_let_conflicts() {
        let mut scopes = stack_with_function_scope();
        scopes.declare_var("x", false, true).unwrap();
        assert!(scopes
            .declare_lexical("x", BindingKind::Let, false, true)
            .is_err());
    }

    #[test]
    fn test_let_then_var_conflicts() {
        let mut scopes = stack_with_function_scope();
        scopes
            .declare_lexical("x", BindingKind::Let, false, true)
            .unwrap();
        assert!(scopes.declare_var("x", false, true).is_err());
    }

    #[test]
    fn test_let_shadows_outer_var() {
        let mut scopes = stack_with_function_scope();
        scopes.declare_var("x", false, true).unwrap();
        scopes.push(ScopeKind::Block);
        assert!(scopes
            .declare_lexical("x", BindingKind::Let, false, true)
            .is_ok());
    }

    #[test]
    fn test_nested_var_conflicts_with_outer_let() {
        let mut scopes = stack_with_function_scope();
        scopes
            .declare_lexical("x", BindingKind::Let, false, true)
            .unwrap();
        scopes.push(ScopeKind::Block);
        assert!(scopes.declare_var("x", false, true).is_err());
    }

    #[test]
    fn test_simple_catch_allows_var() {
        let mut scopes = stack_with_function_scope();
        scopes.push(ScopeKind::Catch { simple: true });
        scopes.declare_parameter("e", BindingKind::CatchParam);
        assert!(scopes.declare_var("e", false, true).is_ok());
        // ...but not without web compat.
        assert!(scopes.declare_var("e", false, false).is_err());
    }

    #[test]
    fn test_pattern_catch_rejects_var_from_nested_block() {
        let mut scopes = stack_with_function_scope();
        scopes.push(ScopeKind::Catch { simple: false });
        scopes.declare_parameter("e", BindingKind::CatchParam);
        scopes.push(ScopeKind::Block);
        assert!(scopes.declare_var("e", false, true).is_err());
    }

    #[test]
    fn test_catch_param_rejects_lexical_redeclaration() {
        let mut scopes = stack_with_function_scope();
        scopes.push(ScopeKind::Catch { simple: true });
        scopes.declare_parameter("e", BindingKind::CatchParam);
        assert!(scopes
            .declare_lexical("e", BindingKind::Let, false, true)
            .is_err());
    }

    #[test]
    fn test_param_allows_var_but_not_let() {
        let mut scopes = stack_with_function_scope();
        scopes.declare_parameter("a", BindingKind::Parameter);
        assert!(scopes.declare_var("a", false, true).is_ok());
        assert!(scopes
            .declare_lexical("a", BindingKind::Let, false, true)
            .is_err());
    }

    #[test]
    fn test_block_function_duplicates_sloppy_only() {
        let mut scopes = stack_with_function_scope();
        scopes.push(ScopeKind::Block);
        scopes
            .declare_lexical("f", BindingKind::Function, false, true)
            .unwrap();
        assert!(scopes
            .declare_lexical("f", BindingKind::Function, false, true)
            .is_ok());

        let mut strict = stack_with_function_scope();
        strict.push(ScopeKind::Block);
        strict
            .declare_lexical("f", BindingKind::Function, true, true)
            .unwrap();
        assert!(strict
            .declare_lexical("f", BindingKind::Function, true, true)
            .is_err());
    }

    #[test]
    fn test_labels() {
        let mut labels = LabelTracker::new();
        labels.push("outer", true).unwrap();
        assert!(labels.push("outer", false).is_err());
        labels.push("inner", false).unwrap();
        assert!(labels.resolve_break("outer"));
        assert_eq!(labels.resolve_continue("outer"), ContinueTarget::Found);
        assert_eq!(labels.resolve_continue("inner"), ContinueTarget::NotIteration);

        // Labels do not cross function boundaries.
        labels.enter_function();
        assert!(!labels.resolve_break("outer"));
        assert_eq!(labels.resolve_continue("outer"), ContinueTarget::NotFound);
        labels.exit_function();
        assert!(labels.resolve_break("outer"));
    }
}
