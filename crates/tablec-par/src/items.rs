//! Top-level declarations: imports, functions, constants, structs,
//! macros, and the `#overload` / `#test` directives.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tablec_lex::{Keyword, TokenKind};
use tablec_util::Symbol;

use crate::ast::*;
use crate::expr::prec;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one top-level item into the module.
    pub(crate) fn toplevel_item(&mut self, module: &mut Module) -> Option<()> {
        self.skip_eols();

        let is_pub = self.eat_kw(Keyword::Pub);

        match self.top().kind {
            TokenKind::Keyword(Keyword::Pub) => self.error("Repeated 'pub'"),

            TokenKind::Keyword(Keyword::Import) => {
                if is_pub {
                    let span = self.top().span;
                    self.error_nonfatal(span, "'pub' cannot be applied to import statements");
                }
                let import = self.import()?;
                if let Some(local) = &import.local_name {
                    if module.scope.contains_key(&local.name) {
                        self.error_nonfatal(
                            local.span,
                            format!(
                                "Something named '{}' already exists in this module.",
                                local.name
                            ),
                        );
                    } else {
                        let key = local.name;
                        module.scope.insert(key, Item::Import(import));
                    }
                } else if import.is_using {
                    // Bare `using` imports get a synthetic scope key.
                    let key = Symbol::intern(&format!(".import_{}", module.scope.len()));
                    module.scope.insert(key, Item::Import(import));
                }
                self.end_of_line("Expected end-of-line after import")?;
                Some(())
            },

            TokenKind::Keyword(Keyword::Func) => {
                let func = self.func_def(is_pub)?;
                let Some(name) = func.name.clone() else {
                    return self.error_at(
                        func.span,
                        "This function in module scope does not have a name.",
                    );
                };
                match module.scope.entry(name.name) {
                    Entry::Occupied(mut existing) => match existing.get_mut() {
                        Item::Func(overload) => {
                            overload.span = overload.span.to(func.span);
                            overload.members.push(OverloadMember::Def(func));
                        },
                        _ => {
                            return self.error_at(
                                name.span,
                                format!(
                                    "Function definition for '{}' conflicts with something already in scope.",
                                    name.name
                                ),
                            );
                        },
                    },
                    Entry::Vacant(slot) => {
                        slot.insert(Item::Func(FuncOverload {
                            name: name.name,
                            span: func.span,
                            members: vec![OverloadMember::Def(func)],
                        }));
                    },
                }
                self.end_of_line("Expected end-of-line after function definition")?;
                Some(())
            },

            TokenKind::Keyword(Keyword::Const) => {
                self.pop();
                if self.at(TokenKind::LBrace) {
                    // Block form: one constant per line.
                    self.pop();
                    self.consume(
                        TokenKind::Eol,
                        "Expected end of line to begin const block.",
                    )?;
                    while !self.at(TokenKind::RBrace) {
                        if self.at(TokenKind::Eol) {
                            self.pop();
                            continue;
                        }
                        if self.at(TokenKind::Eof) {
                            return self.error("Expected end of const block");
                        }
                        let constant = self.const_def(is_pub)?;
                        self.register_const(module, constant);
                        self.consume(
                            TokenKind::Eol,
                            "Expected end of line after block constant",
                        )?;
                    }
                    self.pop();
                    self.end_of_line("Expected end of line after const block")?;
                } else {
                    let constant = self.const_def(is_pub)?;
                    self.register_const(module, constant);
                    self.end_of_line("Expected end of line after const")?;
                }
                Some(())
            },

            TokenKind::Keyword(Keyword::Struct) => {
                let item = self.struct_def(is_pub)?;
                if module.scope.contains_key(&item.name.name) {
                    self.error_nonfatal(
                        item.name.span,
                        format!(
                            "Something named '{}' already exists in this module.",
                            item.name.name
                        ),
                    );
                } else {
                    let key = item.name.name;
                    module.scope.insert(key, Item::Struct(item));
                }
                self.end_of_line("Expected end-of-line after struct definition")?;
                Some(())
            },

            TokenKind::Keyword(Keyword::Macro) => {
                let item = self.macro_def(is_pub)?;
                if module.scope.contains_key(&item.name.name) {
                    self.error_nonfatal(
                        item.name.span,
                        format!(
                            "Something named '{}' already exists in this module.",
                            item.name.name
                        ),
                    );
                } else {
                    let key = item.name.name;
                    module.scope.insert(key, Item::Macro(item));
                }
                self.end_of_line("Expected end-of-line after macro definition")?;
                Some(())
            },

            TokenKind::Directive(name) if name.as_str() == "overload" => {
                if is_pub {
                    let span = self.top().span;
                    self.error_nonfatal(span, "'pub' cannot be applied to #overload");
                }
                let overload = self.overload_directive()?;
                if module.scope.contains_key(&overload.name) {
                    let span = overload.span;
                    self.error_nonfatal(
                        span,
                        format!(
                            "Something named '{}' already exists in this module.",
                            overload.name
                        ),
                    );
                } else {
                    module.scope.insert(overload.name, Item::Func(overload));
                }
                self.end_of_line("Expected end-of-line after #overload")?;
                Some(())
            },

            TokenKind::Directive(name) if name.as_str() == "test" => {
                if is_pub {
                    let span = self.top().span;
                    self.error_nonfatal(span, "'pub' cannot be applied to tests");
                }
                let test = self.test_def()?;
                module.tests.push(test);
                self.end_of_line("Expected end-of-line after test")?;
                Some(())
            },

            TokenKind::RParen => self.error("Unmatched parenthesis"),
            TokenKind::RBrace => self.error("Unmatched curly brace"),
            TokenKind::RSquare => self.error("Unmatched square bracket"),

            TokenKind::Eol => {
                if is_pub {
                    return self.error("'pub' must be followed by a top-level declaration");
                }
                self.pop();
                Some(())
            },
            TokenKind::Eof => {
                if is_pub {
                    return self.error("'pub' must be followed by a top-level declaration");
                }
                Some(())
            },

            _ => {
                let literal = self.top().literal;
                self.error(format!("Top level scope cannot begin with '{}'", literal))
            },
        }
    }

    fn register_const(&mut self, module: &mut Module, constant: Const) {
        if module.scope.contains_key(&constant.name.name) {
            self.error_nonfatal(
                constant.name.span,
                format!(
                    "Something named '{}' already exists in this module.",
                    constant.name.name
                ),
            );
        } else {
            let key = constant.name.name;
            module.scope.insert(key, Item::Const(constant));
        }
    }

    /// `name [: type] = value` after the `const` keyword.
    fn const_def(&mut self, is_pub: bool) -> Option<Const> {
        let start = self.top().span;
        let name = self.declared_name()?;

        let ty = match self.top().kind {
            TokenKind::Colon => {
                self.pop();
                if self.at(TokenKind::Assign) {
                    None
                } else {
                    let ty = self.type_expr(0)?;
                    self.expect(TokenKind::Assign, "Expected '=' after type")?;
                    Some(ty)
                }
            },
            TokenKind::Assign => None,
            _ => return self.error("Expected ':' or '=' after constant name"),
        };
        self.pop();
        let value = self.expression(prec::MIN)?;
        let span = self.close_span(start);
        Some(Const {
            name,
            ty,
            value,
            is_pub,
            span,
        })
    }

    /// An `import` statement in one of its forms:
    /// `import a.b`, `import name = a.b`, `import name = "file"`,
    /// `import using a.b`, `import using "file"`.
    fn import(&mut self) -> Option<Import> {
        let start = self.pop().span;
        let mut import = Import {
            local_name: None,
            qualified_name: None,
            imported_file: None,
            is_using: false,
            span: start,
        };

        match self.top().kind {
            TokenKind::Keyword(Keyword::Using) => {
                import.is_using = true;
                self.pop();
                match self.top().kind {
                    TokenKind::Str(path) => {
                        self.pop();
                        import.imported_file = Some(path);
                    },
                    TokenKind::Ident(_) => {
                        let qualified = self.qualname()?;
                        import.local_name = Some(Name {
                            name: qualified.join(),
                            span: qualified.span,
                        });
                        import.qualified_name = Some(qualified);
                    },
                    _ => return self.error("Invalid target of 'using' import"),
                }
                import.span = self.close_span(start);
                return Some(import);
            },
            TokenKind::Ident(_) => {},
            TokenKind::Eol => return self.error("import statement is missing its target"),
            _ => return self.error("Invalid target of import"),
        }

        match self.lookahead(1).kind {
            TokenKind::Eol | TokenKind::Eof | TokenKind::Dot => {
                // Qualified-name form; the local name is the joined path.
                let qualified = self.qualname()?;
                import.local_name = Some(Name {
                    name: qualified.join(),
                    span: qualified.span,
                });
                import.qualified_name = Some(qualified);
            },
            TokenKind::Assign => {
                import.local_name = Some(self.declared_name()?);
                self.pop();
                match self.top().kind {
                    TokenKind::Str(path) => {
                        self.pop();
                        import.imported_file = Some(path);
                    },
                    TokenKind::Ident(_) => {
                        import.qualified_name = Some(self.qualname()?);
                    },
                    TokenKind::Eol => {
                        return self.error("localized import statement is missing its target")
                    },
                    _ => return self.error("Invalid target of localized import"),
                }
            },
            _ => {
                self.pop();
                let literal = self.top().literal;
                return self.error(format!(
                    "Unexpected token in import statement: '{}'",
                    literal
                ));
            },
        }
        import.span = self.close_span(start);
        Some(import)
    }

    /// A `func` definition. Functions may be named by an identifier or by
    /// an operator spelling (for operator overloads).
    pub(crate) fn func_def(&mut self, is_pub: bool) -> Option<FuncDef> {
        let start = self.pop().span;

        let func_name = match self.top().kind {
            TokenKind::Ident(_) => Some(self.declared_name()?),
            kind if kind.is_operator() || kind.is_comparison() => {
                let token = self.pop();
                Some(Name {
                    name: token.literal,
                    span: token.span,
                })
            },
            TokenKind::LParen => None,
            _ => {
                return self.error("Expected an identifier or operator to name this function")
            },
        };
        let func_display = func_name
            .as_ref()
            .map(|n| n.name.as_str())
            .unwrap_or("<anonymous>");

        self.consume(TokenKind::LParen, "Expected a function parameter list")?;
        let mut params: IndexMap<Symbol, Param> = IndexMap::new();
        let mut vararg_seen = false;
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::Eof) {
                return self.error("Expected end of parameter list");
            }
            if !vararg_seen && self.at(TokenKind::Ellipsis) {
                // A lone `...` separates positional from keyword-only
                // parameters.
                self.pop();
                vararg_seen = true;
                self.consume(
                    TokenKind::Comma,
                    "Expected comma after lone ellipsis in parameter list",
                )?;
                if !matches!(self.top().kind, TokenKind::Ident(_)) {
                    return self.error("Expected a keyword-only parameter after lone ellipsis");
                }
            }
            if !matches!(self.top().kind, TokenKind::Ident(_)) {
                return self.error("Expected the name of a parameter");
            }
            let param_start = self.top().span;
            let is_kw_only = vararg_seen;
            let name = self.declared_name()?;
            if params.contains_key(&name.name) {
                self.error_nonfatal(
                    name.span,
                    format!(
                        "There is already a parameter named '{}' in function '{}'",
                        name.name, func_display
                    ),
                );
            }

            let mut param = Param {
                name: name.clone(),
                ty: None,
                default: None,
                is_vararg: false,
                is_kw_only,
                span: param_start,
            };
            if self.eat(TokenKind::Colon) {
                param.ty = Some(self.type_expr(0)?);
                if self.at(TokenKind::Ellipsis) {
                    if vararg_seen {
                        let span = self.top().span;
                        self.error_nonfatal(
                            span,
                            "Parameter lists may only include one vararg",
                        );
                    }
                    self.pop();
                    param.is_vararg = true;
                    vararg_seen = true;
                }
            }
            if self.eat(TokenKind::Assign) {
                if param.is_vararg {
                    let span = self.top().span;
                    self.error_nonfatal(span, "Varargs cannot have a default value");
                }
                param.default = Some(self.expression(prec::MIN)?);
            }
            param.span = self.close_span(param_start);
            params.insert(name.name, param);

            if self.at(TokenKind::Comma) {
                self.pop();
            } else {
                self.expect(
                    TokenKind::RParen,
                    "Expected comma or end of parameter list",
                )?;
            }
        }
        self.pop();

        let ret_type = if self.eat(TokenKind::Colon) {
            Some(self.type_expr(0)?)
        } else {
            None
        };

        self.expect(TokenKind::LBrace, "Expected function body")?;
        let body = self.block()?;

        let span = self.close_span(start);
        Some(FuncDef {
            name: func_name,
            params,
            ret_type,
            body,
            is_pub,
            span,
        })
    }

    /// `struct Name [(constraints)] { field groups }`
    fn struct_def(&mut self, is_pub: bool) -> Option<Struct> {
        let start = self.pop().span;
        let name = self.declared_name()?;

        let mut constraints = Vec::new();
        if self.eat(TokenKind::LParen) {
            while !self.at(TokenKind::RParen) {
                if self.at(TokenKind::Eof) {
                    return self.error("Expected end of struct constraints");
                }
                constraints.push(self.expression(prec::MIN)?);
                if self.at(TokenKind::Comma) {
                    self.pop();
                } else if !self.at(TokenKind::RParen) {
                    return self.error("Expected a comma here.");
                }
            }
            self.pop();
        }

        self.skip_eols();
        self.consume(TokenKind::LBrace, "Expected struct body")?;
        let mut fields: IndexMap<Symbol, Field> = IndexMap::new();
        loop {
            self.skip_eols();
            match self.top().kind {
                TokenKind::RBrace => {
                    self.pop();
                    break;
                },
                TokenKind::Eof => return self.error("Expected end of struct body"),
                _ => {
                    self.field_group(&mut fields)?;
                    self.end_of_line("Expected end of line after struct fields")?;
                },
            }
        }

        let span = self.close_span(start);
        Some(Struct {
            name,
            constraints,
            fields,
            is_pub,
            span,
        })
    }

    /// One field group: `[using] a, b: type [= default, default]`.
    /// Grouped names share the type; defaults pair up positionally.
    fn field_group(&mut self, fields: &mut IndexMap<Symbol, Field>) -> Option<()> {
        let group_start = self.top().span;
        let is_using = self.eat_kw(Keyword::Using);
        let mut names = vec![self.declared_name()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.declared_name()?);
        }
        self.consume(TokenKind::Colon, "Expected ':' and a type for struct fields")?;
        let ty = self.type_expr(0)?;

        let mut defaults: Vec<Expr> = Vec::new();
        if self.eat(TokenKind::Assign) {
            defaults.push(self.expression(prec::MIN)?);
            while self.eat(TokenKind::Comma) {
                defaults.push(self.expression(prec::MIN)?);
            }
        }
        if defaults.len() > names.len() {
            let span = self.close_span(group_start);
            self.error_nonfatal(span, "Too many default values for this field list");
        }

        let mut default_iter = defaults.into_iter();
        for name in names {
            if fields.contains_key(&name.name) {
                self.error_nonfatal(
                    name.span,
                    format!("There is already a field named '{}'", name.name),
                );
                let _ = default_iter.next();
                continue;
            }
            let default = default_iter.next();
            let span = match &default {
                Some(expr) => name.span.to(expr.span()),
                None => name.span,
            };
            let key = name.name;
            fields.insert(
                key,
                Field {
                    name,
                    ty: ty.clone(),
                    default,
                    is_using,
                    span,
                },
            );
        }
        Some(())
    }

    /// `macro name(params) { body }`
    fn macro_def(&mut self, is_pub: bool) -> Option<MacroDef> {
        let start = self.pop().span;
        let name = self.declared_name()?;
        self.consume(TokenKind::LParen, "Expected a macro parameter list")?;
        let mut params = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::Eof) {
                return self.error("Expected end of macro parameter list");
            }
            params.push(self.declared_name()?);
            if self.at(TokenKind::Comma) {
                self.pop();
            } else {
                self.expect(
                    TokenKind::RParen,
                    "Expected comma or end of macro parameter list",
                )?;
            }
        }
        self.pop();
        self.expect(TokenKind::LBrace, "Expected macro body")?;
        let body = self.block()?;
        let span = self.close_span(start);
        Some(MacroDef {
            name,
            params,
            body,
            is_pub,
            span,
        })
    }

    /// `#overload name: member, member, ...` declares an overload set
    /// from existing function names.
    fn overload_directive(&mut self) -> Option<FuncOverload> {
        let start = self.pop().span;
        let name = self.declared_name()?;
        self.consume(TokenKind::Colon, "Expected ':' after overload name")?;
        let mut members = vec![OverloadMember::Named(self.simple_name()?)];
        while self.eat(TokenKind::Comma) {
            members.push(OverloadMember::Named(self.simple_name()?));
        }
        let span = self.close_span(start);
        Some(FuncOverload {
            name: name.name,
            members,
            span,
        })
    }

    /// `#test ["description"] { body }`
    fn test_def(&mut self) -> Option<Test> {
        let start = self.pop().span;
        let description = match self.top().kind {
            TokenKind::Str(text) => {
                self.pop();
                Some(text)
            },
            _ => None,
        };
        self.expect(TokenKind::LBrace, "Expected test body")?;
        let body = self.block()?;
        let span = self.close_span(start);
        Some(Test {
            description,
            body,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    fn get_item<'m>(module: &'m Module, name: &str) -> &'m Item {
        module
            .scope
            .get(&Symbol::intern(name))
            .unwrap_or_else(|| panic!("no item named {}", name))
    }

    #[test]
    fn test_func_def_full() {
        // Parameters keep order; defaults and return type attach.
        let module = parse_module("func f(x: int, y: int = 0): int { return x + y\n }\n");
        let Item::Func(overload) = get_item(&module, "f") else {
            panic!("expected func");
        };
        assert_eq!(overload.members.len(), 1);
        let OverloadMember::Def(func) = &overload.members[0] else {
            panic!("expected definition");
        };
        let keys: Vec<_> = func.params.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert!(func.params[0].ty.is_some());
        assert!(func.params[0].default.is_none());
        assert!(matches!(func.params[1].default, Some(Expr::Int(_))));
        assert!(matches!(func.ret_type, Some(Type::Simple(_))));
        assert_eq!(func.body.body.len(), 1);
        let Stmt::Return(ret) = &func.body.body[0] else {
            panic!("expected return");
        };
        assert!(matches!(ret.value, Some(Expr::Binop(_))));
    }

    #[test]
    fn test_func_overloads_merge() {
        let module =
            parse_module("func f(x: int) { return x\n }\nfunc f(x: float) { return x\n }\n");
        let Item::Func(overload) = get_item(&module, "f") else {
            panic!("expected func");
        };
        assert_eq!(overload.members.len(), 2);
    }

    #[test]
    fn test_func_conflicts_with_const() {
        let handler = parse_module_err("const f = 1\nfunc f() { return 0\n }\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("conflicts")));
    }

    #[test]
    fn test_operator_func_name() {
        let module = parse_module("func + (a: vec, b: vec): vec { return add(a, b)\n }\n");
        let Item::Func(overload) = get_item(&module, "+") else {
            panic!("expected operator func");
        };
        assert_eq!(overload.name.as_str(), "+");
    }

    #[test]
    fn test_anonymous_func_at_module_scope_fails() {
        let handler = parse_module_err("func () { return 0\n }\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("does not have a name")));
    }

    #[test]
    fn test_vararg_parameter() {
        let module = parse_module("func f(xs: int...) { return xs\n }\n");
        let Item::Func(overload) = get_item(&module, "f") else {
            panic!("expected func");
        };
        let OverloadMember::Def(func) = &overload.members[0] else {
            panic!("expected definition");
        };
        assert!(func.params[0].is_vararg);
        assert_eq!(
            func.params.values().filter(|p| p.is_vararg).count(),
            1
        );
    }

    #[test]
    fn test_keyword_only_after_vararg() {
        let module = parse_module("func f(xs: int..., flag: bool = false) { return xs\n }\n");
        let Item::Func(overload) = get_item(&module, "f") else {
            panic!("expected func");
        };
        let OverloadMember::Def(func) = &overload.members[0] else {
            panic!("expected definition");
        };
        assert!(!func.params[0].is_kw_only);
        assert!(func.params[1].is_kw_only);
    }

    #[test]
    fn test_lone_ellipsis_separator() {
        let module = parse_module("func f(a: int, ..., b: int = 1) { return a\n }\n");
        let Item::Func(overload) = get_item(&module, "f") else {
            panic!("expected func");
        };
        let OverloadMember::Def(func) = &overload.members[0] else {
            panic!("expected definition");
        };
        assert!(!func.params[0].is_kw_only);
        assert!(func.params[1].is_kw_only);
        assert!(!func.params.values().any(|p| p.is_vararg));
    }

    #[test]
    fn test_duplicate_parameter_diagnosed() {
        let handler = parse_module_err("func f(x: int, x: int) { return x\n }\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("already a parameter")));
    }

    #[test]
    fn test_vararg_with_default_diagnosed() {
        let handler = parse_module_err("func f(xs: int... = 1) { return xs\n }\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("cannot have a default")));
    }

    #[test]
    fn test_second_vararg_diagnosed() {
        let handler =
            parse_module_err("func f(a: int..., b: int...) { return a\n }\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("one vararg")));
    }

    #[test]
    fn test_const_block() {
        let module = parse_module("const {\n  a = 1\n  b: int = 2\n\n  c = 3\n}\n");
        assert_eq!(module.scope.len(), 3);
        assert!(matches!(get_item(&module, "b"), Item::Const(c) if c.ty.is_some()));
    }

    #[test]
    fn test_pub_applies_to_whole_const_block() {
        let module = parse_module("pub const {\n  a = 1\n  b = 2\n}\n");
        for item in module.scope.values() {
            let Item::Const(constant) = item else {
                panic!("expected const");
            };
            assert!(constant.is_pub);
        }
    }

    #[test]
    fn test_import_qualified() {
        let module = parse_module("import io.file\n");
        let Item::Import(import) = get_item(&module, "io.file") else {
            panic!("expected import");
        };
        assert!(!import.is_using);
        assert_eq!(import.qualified_name.as_ref().unwrap().parts.len(), 2);
        assert!(import.imported_file.is_none());
    }

    #[test]
    fn test_import_localized_name() {
        let module = parse_module("import f = io.file\n");
        let Item::Import(import) = get_item(&module, "f") else {
            panic!("expected import");
        };
        assert!(import.qualified_name.is_some());
    }

    #[test]
    fn test_import_localized_file() {
        let module = parse_module("import helpers = \"helpers.tbl\"\n");
        let Item::Import(import) = get_item(&module, "helpers") else {
            panic!("expected import");
        };
        assert_eq!(import.imported_file.unwrap().as_str(), "helpers.tbl");
    }

    #[test]
    fn test_import_using_file_gets_synthetic_key() {
        let module = parse_module("import using \"prelude.tbl\"\n");
        let (key, item) = module.scope.get_index(0).unwrap();
        assert_eq!(key.as_str(), ".import_0");
        assert!(matches!(item, Item::Import(imp) if imp.is_using));
    }

    #[test]
    fn test_pub_import_diagnosed() {
        let handler = parse_module_err("pub import io.file\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("'pub' cannot be applied to import")));
    }

    #[test]
    fn test_import_missing_target() {
        parse_module_err("import\n");
    }

    #[test]
    fn test_struct_def() {
        let source = "struct Point {\n  x, y: float = 0.0, 0.0\n  label: text\n}\n";
        let module = parse_module(source);
        let Item::Struct(item) = get_item(&module, "Point") else {
            panic!("expected struct");
        };
        let keys: Vec<_> = item.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["x", "y", "label"]);
        assert!(item.fields[0].default.is_some());
        assert!(item.fields[1].default.is_some());
        assert!(item.fields[2].default.is_none());
    }

    #[test]
    fn test_struct_using_field() {
        let module = parse_module("struct Named {\n  using base: Entity\n  name: text\n}\n");
        let Item::Struct(item) = get_item(&module, "Named") else {
            panic!("expected struct");
        };
        assert!(item.fields[0].is_using);
        assert!(!item.fields[1].is_using);
    }

    #[test]
    fn test_struct_too_many_defaults() {
        let handler =
            parse_module_err("struct P {\n  x, y: int = 1, 2, 3\n}\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Too many default values")));
    }

    #[test]
    fn test_struct_constraints() {
        let module = parse_module("struct Range(low <= high) {\n  low, high: int\n}\n");
        let Item::Struct(item) = get_item(&module, "Range") else {
            panic!("expected struct");
        };
        assert_eq!(item.constraints.len(), 1);
        assert!(matches!(item.constraints[0], Expr::Cmp(_)));
    }

    #[test]
    fn test_macro_def() {
        let module = parse_module("macro twice(body) {\n  body\n  body\n}\n");
        let Item::Macro(item) = get_item(&module, "twice") else {
            panic!("expected macro");
        };
        assert_eq!(item.params.len(), 1);
        assert_eq!(item.body.body.len(), 2);
    }

    #[test]
    fn test_overload_directive() {
        let module =
            parse_module("#overload area: circle_area, square_area\n");
        let Item::Func(overload) = get_item(&module, "area") else {
            panic!("expected overload");
        };
        assert_eq!(overload.members.len(), 2);
        assert!(matches!(overload.members[0], OverloadMember::Named(_)));
    }

    #[test]
    fn test_test_directive() {
        let module = parse_module("#test \"addition works\" {\n  assert 1 + 1 == 2\n}\n");
        assert_eq!(module.tests.len(), 1);
        assert_eq!(
            module.tests[0].description.unwrap().as_str(),
            "addition works"
        );
        assert!(module.scope.is_empty());
    }

    #[test]
    fn test_test_without_description() {
        let module = parse_module("#test {\n  assert true\n}\n");
        assert!(module.tests[0].description.is_none());
    }

    #[test]
    fn test_unmatched_brackets_diagnosed() {
        let handler = parse_module_err(")\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Unmatched parenthesis")));
        let handler = parse_module_err("}\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Unmatched curly brace")));
    }

    #[test]
    fn test_repeated_pub_diagnosed() {
        let handler = parse_module_err("pub pub const x = 1\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Repeated 'pub'")));
    }

    #[test]
    fn test_trailing_pub_diagnosed() {
        let handler = parse_module_err("pub\n");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("'pub' must be followed")));
    }
}
