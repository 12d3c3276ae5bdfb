//! The parsing context threaded through every recursive parse call.
//!
//! The context is a value type: entering a nested construct derives a
//! copy (`with`/`without`) and passes it down, so returning from a
//! recursive call can never leak a flag into a sibling construct. Strict
//! is monotone within a function body: derived contexts may set it, and
//! nothing below ever clears it.

bitflags::bitflags! {
    /// Grammar-context flags consulted throughout the parser.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Context: u32 {
        const NONE                  = 0;
        /// Strict mode code (directive, module, or class body).
        const STRICT                = 1 << 0;
        /// Module goal symbol; implies STRICT and reserves `await`.
        const MODULE                = 1 << 1;
        /// Inside any function body (`return` legality).
        const IN_FUNCTION           = 1 << 2;
        /// Inside a generator body (`yield` is an expression).
        const IN_GENERATOR          = 1 << 3;
        /// Inside an async body or module top level (`await` legality).
        const IN_ASYNC              = 1 << 4;
        /// Inside an iteration statement (`continue`/plain `break`).
        const IN_LOOP               = 1 << 5;
        /// Inside a switch block (plain `break`).
        const IN_SWITCH             = 1 << 6;
        /// `in` is a relational operator here (off in for-statement heads).
        const ALLOW_IN              = 1 << 7;
        /// Inside a class static initialization block.
        const IN_CLASS_STATIC_BLOCK = 1 << 8;
        /// Parsing a `new` callee: call parentheses belong to `new`.
        const DISALLOW_CALL         = 1 << 9;
        /// Inside a formal parameter list (`yield`/`await` restrictions).
        const IN_PARAMETERS         = 1 << 10;
        /// `super.x` is legal (method bodies, class field initializers).
        const ALLOW_SUPER_PROPERTY  = 1 << 11;
        /// `super(...)` is legal (derived-class constructors).
        const ALLOW_SUPER_CALL      = 1 << 12;
        /// Inside a class field initializer (`arguments` is illegal).
        const IN_CLASS_FIELD_INIT   = 1 << 13;
        /// Lexically inside a class body: private names resolve. Unlike
        /// the other flags this survives function boundaries, because
        /// closures inside methods still see the class's private names.
        const IN_CLASS_BODY         = 1 << 14;
        /// `new.target` resolves here: non-arrow function bodies, class
        /// field initializers, and static blocks. Arrows inherit it from
        /// their enclosing construct.
        const ALLOW_NEW_TARGET      = 1 << 15;
    }
}

impl Context {
    /// Derive a copy with the given flags set.
    #[inline]
    #[must_use]
    pub fn with(self, flags: Context) -> Context {
        self | flags
    }

    /// Derive a copy with the given flags cleared.
    #[inline]
    #[must_use]
    pub fn without(self, flags: Context) -> Context {
        self & !flags
    }

    /// Query a flag.
    #[inline]
    pub fn has(self, flags: Context) -> bool {
        self.contains(flags)
    }

    /// The context a function body starts from: caller flags that do not
    /// cross a function boundary are cleared, strictness survives.
    #[inline]
    #[must_use]
    pub fn for_function_body(self) -> Context {
        self.without(
            Context::IN_LOOP
                | Context::IN_SWITCH
                | Context::IN_PARAMETERS
                | Context::DISALLOW_CALL
                | Context::IN_GENERATOR
                | Context::IN_ASYNC
                | Context::IN_CLASS_STATIC_BLOCK
                | Context::IN_CLASS_FIELD_INIT
                | Context::ALLOW_SUPER_CALL
                | Context::ALLOW_SUPER_PROPERTY,
        )
        .with(Context::IN_FUNCTION | Context::ALLOW_IN | Context::ALLOW_NEW_TARGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functional_update_leaves_original() {
        let ctx = Context::STRICT;
        let derived = ctx.with(Context::IN_LOOP);
        assert!(derived.has(Context::IN_LOOP));
        assert!(!ctx.has(Context::IN_LOOP));
    }

    #[test]
    fn test_function_body_context_resets_control_flags() {
        let ctx = Context::STRICT
            .with(Context::IN_LOOP | Context::IN_SWITCH | Context::IN_GENERATOR);
        let body = ctx.for_function_body();
        assert!(body.has(Context::STRICT));
        assert!(body.has(Context::IN_FUNCTION));
        assert!(!body.has(Context::IN_LOOP));
        assert!(!body.has(Context::IN_SWITCH));
        assert!(!body.has(Context::IN_GENERATOR));
    }
}
