/// Declaration parsing methods.
///
/// This chunk parses everything outside method bodies: extern aliases, using directives, attribute sections,
/// namespaces, type declarations and their members.
///
/// ## Notes
/// - Class, struct and interface bodies share one member parser; each body then reports the member kinds it does not
///   accept while keeping them in the tree.
/// - Members that start with a type (fields, properties, indexers, methods, operators, events without accessors)
///   are told apart by a speculative "type, then member name" head and the token after it.
/// - Error recovery is handled by `Parser::synchronize_member()` (in `helpers.rs`).

impl<'a> Parser<'a> {
    // ========================================================================
    // Compilation unit prologue
    // ========================================================================

    /// `extern alias X;` directives.
    fn extern_aliases(&mut self) -> Vec<Spanned<Ident>> {
        let mut externs = Vec::new();
        while self.check_keyword(KeywordId::Extern) && self.peek_kind(1).is_contextual(KeywordId::Alias) {
            let start_pos = self.pos;
            let start = self.advance().span.start;
            self.advance();
            match self.identifier() {
                Ok(name) => {
                    self.expect_semicolon();
                    externs.push(Spanned::new(name, self.span_from(start)));
                }
                Err(e) => {
                    self.report(e);
                    self.synchronize_statement(start_pos);
                }
            }
        }
        externs
    }

    fn using_directives(&mut self) -> Vec<Spanned<UsingDirective>> {
        let mut usings = Vec::new();
        while self.check_keyword(KeywordId::Using) {
            let start_pos = self.pos;
            match self.using_directive() {
                Ok(using) => usings.push(using),
                Err(e) => {
                    self.report(e);
                    self.synchronize_statement(start_pos);
                }
            }
        }
        usings
    }

    /// `using N.S;`, `using static T;` or `using A = T;`
    fn using_directive(&mut self) -> PResult<Spanned<UsingDirective>> {
        let start = self.expect_keyword(KeywordId::Using)?.start;
        let directive = if self.match_keyword(KeywordId::Static) {
            UsingDirective::Static(self.type_name()?)
        } else if self.check_ident() && self.peek_kind(1).is_operator(OperatorId::Eq) {
            let alias = self.identifier()?;
            self.advance();
            let target = self.parse_type(TypeMode::Normal)?;
            UsingDirective::Alias { alias, target }
        } else {
            UsingDirective::Namespace(self.type_name()?)
        };
        self.expect_semicolon();
        Ok(Spanned::new(directive, self.span_from(start)))
    }

    /// `[assembly: ...]` and `[module: ...]` sections before the first declaration.
    fn global_attributes(&mut self) -> Vec<Spanned<AttributeSection>> {
        let mut sections = Vec::new();
        while self.check_punct(PunctuationId::LBracket)
            && matches!(self.peek_at(1).ident(), Some("assembly" | "module"))
            && self.peek_kind(2).is_punctuation(PunctuationId::Colon)
        {
            match self.attribute_section() {
                Ok(section) => sections.push(section),
                Err(e) => {
                    // The member loop resynchronises on whatever is left.
                    self.report(e);
                    break;
                }
            }
        }
        sections
    }

    // ========================================================================
    // Namespaces and types
    // ========================================================================

    fn namespace_member(&mut self) -> PResult<Spanned<NamespaceMember>> {
        let start = self.current_span().start;
        if self.check_keyword(KeywordId::Namespace) {
            let namespace = self.namespace_declaration()?;
            return Ok(Spanned::new(NamespaceMember::Namespace(namespace), self.span_from(start)));
        }

        let attributes = self.attribute_sections()?;
        let modifiers = self.modifiers();
        if !self.at_type_declaration() {
            return Err(self.unexpected(&["type or namespace declaration"]));
        }
        let decl = self.type_declaration(attributes, modifiers)?;
        Ok(Spanned::new(NamespaceMember::Type(decl), self.span_from(start)))
    }

    /// `namespace A.B { ... }` or the file-scoped `namespace A.B;`, which owns the rest of the file.
    fn namespace_declaration(&mut self) -> PResult<NamespaceDecl> {
        self.expect_keyword(KeywordId::Namespace)?;
        let name = self.type_name()?;

        if self.match_punct(PunctuationId::Semicolon) {
            let externs = self.extern_aliases();
            let usings = self.using_directives();
            let members = self.namespace_members(false);
            return Ok(NamespaceDecl {
                name,
                file_scoped: true,
                externs,
                usings,
                members,
            });
        }

        self.expect_punct(PunctuationId::LBrace)?;
        let externs = self.extern_aliases();
        let usings = self.using_directives();
        let members = self.namespace_members(true);
        self.expect_closing(PunctuationId::RBrace)?;
        self.match_punct(PunctuationId::Semicolon);
        Ok(NamespaceDecl {
            name,
            file_scoped: false,
            externs,
            usings,
            members,
        })
    }

    fn at_type_declaration(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Keyword(
                KeywordId::Class | KeywordId::Struct | KeywordId::Interface | KeywordId::Enum | KeywordId::Delegate
            )
        )
    }

    /// Type declaration after its attributes and modifiers.
    fn type_declaration(
        &mut self,
        attributes: Vec<Spanned<AttributeSection>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> PResult<TypeDecl> {
        self.nested(|p| {
            let keyword = p.peek().kind.keyword_id();
            match keyword {
                Some(KeywordId::Enum) => p.enum_declaration(attributes, modifiers),
                Some(KeywordId::Delegate) => p.delegate_declaration(attributes, modifiers),
                Some(KeywordId::Class) => p.class_like_declaration(ClassKind::Class, attributes, modifiers),
                Some(KeywordId::Struct) => p.class_like_declaration(ClassKind::Struct, attributes, modifiers),
                Some(KeywordId::Interface) => p.class_like_declaration(ClassKind::Interface, attributes, modifiers),
                _ => Err(p.unexpected(&["`class`", "`struct`", "`interface`", "`enum`", "`delegate`"])),
            }
        })
    }

    fn class_like_declaration(
        &mut self,
        kind: ClassKind,
        attributes: Vec<Spanned<AttributeSection>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> PResult<TypeDecl> {
        self.advance();
        let name = self.identifier()?;
        let type_params = self.optional_type_parameters()?;
        let base_list = self.base_list()?;
        let constraints = self.constraint_clauses()?;

        self.expect_punct(PunctuationId::LBrace)?;
        let members = self.class_members();
        self.expect_closing(PunctuationId::RBrace)?;
        self.match_punct(PunctuationId::Semicolon);
        self.validate_members(kind, &members);

        tracing::trace!(kind = kind.as_str(), name = %name, members = members.len(), "type declaration");
        Ok(TypeDecl {
            attributes,
            modifiers,
            name,
            type_params,
            base_list,
            constraints,
            body: TypeBody::Class { kind, members },
        })
    }

    /// Report members the body kind does not accept. The members stay in the tree.
    fn validate_members(&mut self, kind: ClassKind, members: &[Spanned<MemberDecl>]) {
        for member in members {
            let rejected = match kind {
                ClassKind::Interface => matches!(
                    member.node.kind,
                    MemberKind::Field(_)
                        | MemberKind::Constructor(_)
                        | MemberKind::Destructor(_)
                        | MemberKind::FixedBuffer(_)
                ),
                ClassKind::Struct => matches!(member.node.kind, MemberKind::Destructor(_)),
                ClassKind::Class => matches!(member.node.kind, MemberKind::FixedBuffer(_)),
            };
            if rejected {
                let what = member.node.kind.describe();
                let home = if matches!(member.node.kind, MemberKind::FixedBuffer(_)) { "struct" } else { "class" };
                self.report(
                    SyntaxError::syntax(format!("{} cannot be declared in {}", what, describe_body(kind)), member.span)
                        .with_hint(format!("remove the {what} or move it to a {home}")),
                );
            }
        }
    }

    fn enum_declaration(
        &mut self,
        attributes: Vec<Spanned<AttributeSection>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> PResult<TypeDecl> {
        self.expect_keyword(KeywordId::Enum)?;
        let name = self.identifier()?;
        let base_list = self.base_list()?;

        self.expect_punct(PunctuationId::LBrace)?;
        let mut members = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let attributes = self.attribute_sections()?;
            let name = self.identifier()?;
            let value = if self.match_op(OperatorId::Eq) {
                Some(self.expression()?)
            } else {
                None
            };
            members.push(Spanned::new(
                EnumMember {
                    attributes,
                    name,
                    value,
                },
                self.span_from(start),
            ));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(PunctuationId::RBrace)?;
        self.match_punct(PunctuationId::Semicolon);

        Ok(TypeDecl {
            attributes,
            modifiers,
            name,
            type_params: Vec::new(),
            base_list,
            constraints: Vec::new(),
            body: TypeBody::Enum(members),
        })
    }

    /// `delegate R Name<T>(params) where ...;`
    fn delegate_declaration(
        &mut self,
        attributes: Vec<Spanned<AttributeSection>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> PResult<TypeDecl> {
        self.expect_keyword(KeywordId::Delegate)?;
        let return_type = self.parse_type(TypeMode::Normal)?;
        let name = self.identifier()?;
        let type_params = self.optional_type_parameters()?;
        if !self.check_punct(PunctuationId::LParen) {
            return Err(self.unexpected(&["`(`"]));
        }
        let params = self.parameter_list(PunctuationId::RParen)?;
        let constraints = self.constraint_clauses()?;
        self.expect_semicolon();
        Ok(TypeDecl {
            attributes,
            modifiers,
            name,
            type_params,
            base_list: Vec::new(),
            constraints,
            body: TypeBody::Delegate { return_type, params },
        })
    }

    /// `<[A] in T, out U>` if present.
    fn optional_type_parameters(&mut self) -> PResult<Vec<Spanned<TypeParam>>> {
        if !self.check_op(OperatorId::Lt) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut params = Vec::new();
        loop {
            let start = self.current_span().start;
            let attributes = self.attribute_sections()?;
            let variance = if self.match_keyword(KeywordId::In) {
                Some(Variance::In)
            } else if self.match_keyword(KeywordId::Out) {
                Some(Variance::Out)
            } else {
                None
            };
            let name = self.identifier()?;
            params.push(Spanned::new(
                TypeParam {
                    attributes,
                    variance,
                    name,
                },
                self.span_from(start),
            ));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_op(OperatorId::Gt)?;
        Ok(params)
    }

    fn base_list(&mut self) -> PResult<Vec<Spanned<Type>>> {
        let mut bases = Vec::new();
        if self.match_punct(PunctuationId::Colon) {
            loop {
                bases.push(self.parse_type(TypeMode::Normal)?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        Ok(bases)
    }

    /// `where T : class, new()` clauses.
    fn constraint_clauses(&mut self) -> PResult<Vec<Spanned<ConstraintClause>>> {
        let mut clauses = Vec::new();
        while self.check_contextual(KeywordId::Where) {
            let start = self.advance().span.start;
            let param = self.identifier()?;
            self.expect_punct(PunctuationId::Colon)?;
            let mut constraints = Vec::new();
            loop {
                let constraint_start = self.current_span().start;
                let constraint = if self.match_keyword(KeywordId::Class) {
                    Constraint::Class
                } else if self.match_keyword(KeywordId::Struct) {
                    Constraint::Struct
                } else if self.check_keyword(KeywordId::New) {
                    self.advance();
                    self.expect_punct(PunctuationId::LParen)?;
                    self.expect_punct(PunctuationId::RParen)?;
                    Constraint::New
                } else if self.check_contextual(KeywordId::Unmanaged)
                    && !matches!(
                        self.peek_kind(1),
                        TokenKind::Punctuation(PunctuationId::Dot) | TokenKind::Operator(OperatorId::Lt)
                    )
                {
                    self.advance();
                    Constraint::Unmanaged
                } else {
                    Constraint::Type(self.parse_type(TypeMode::Normal)?.node)
                };
                constraints.push(Spanned::new(constraint, self.span_from(constraint_start)));
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            clauses.push(Spanned::new(ConstraintClause { param, constraints }, self.span_from(start)));
        }
        Ok(clauses)
    }

    // ========================================================================
    // Attributes and modifiers
    // ========================================================================

    fn attribute_sections(&mut self) -> PResult<Vec<Spanned<AttributeSection>>> {
        let mut sections = Vec::new();
        while self.check_punct(PunctuationId::LBracket) {
            sections.push(self.attribute_section()?);
        }
        Ok(sections)
    }

    /// `[target: A, B(1, X = 2)]`
    fn attribute_section(&mut self) -> PResult<Spanned<AttributeSection>> {
        let start = self.expect_punct(PunctuationId::LBracket)?.start;
        let target = if self.peek_kind(1).is_punctuation(PunctuationId::Colon) {
            let target = match &self.peek().kind {
                TokenKind::Ident(name) => Some(name.clone()),
                TokenKind::Keyword(id) => Some(keywords::as_str(*id).to_string()),
                _ => None,
            };
            if target.is_some() {
                self.advance();
                self.advance();
            }
            target
        } else {
            None
        };

        let mut attributes = Vec::new();
        loop {
            let attr_start = self.current_span().start;
            let name = self.type_name()?;
            let args = if self.check_punct(PunctuationId::LParen) {
                self.argument_list(PunctuationId::RParen)?
            } else {
                Vec::new()
            };
            attributes.push(Spanned::new(Attribute { name, args }, self.span_from(attr_start)));
            if !self.match_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RBracket) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBracket)?;
        Ok(Spanned::new(AttributeSection { target, attributes }, self.span_from(start)))
    }

    fn modifiers(&mut self) -> Vec<Spanned<Modifier>> {
        let mut modifiers = Vec::new();
        while let Some(modifier) = self.modifier_at_cursor() {
            let span = self.advance().span;
            modifiers.push(Spanned::new(modifier, span));
        }
        modifiers
    }

    fn modifier_at_cursor(&self) -> Option<Modifier> {
        let modifier = match &self.peek().kind {
            TokenKind::Keyword(id) => match id {
                KeywordId::New => Modifier::New,
                KeywordId::Public => Modifier::Public,
                KeywordId::Protected => Modifier::Protected,
                KeywordId::Internal => Modifier::Internal,
                KeywordId::Private => Modifier::Private,
                KeywordId::Abstract => Modifier::Abstract,
                KeywordId::Sealed => Modifier::Sealed,
                KeywordId::Static => Modifier::Static,
                KeywordId::Readonly => Modifier::Readonly,
                KeywordId::Volatile => Modifier::Volatile,
                KeywordId::Virtual => Modifier::Virtual,
                KeywordId::Override => Modifier::Override,
                KeywordId::Extern => Modifier::Extern,
                KeywordId::Unsafe => Modifier::Unsafe,
                // Otherwise `ref` starts a reference return type.
                KeywordId::Ref if self.ref_struct_follows() => Modifier::Ref,
                _ => return None,
            },
            TokenKind::Ident(name) if name == "async" => {
                if !matches!(self.peek_kind(1), TokenKind::Ident(_) | TokenKind::Keyword(_)) {
                    return None;
                }
                Modifier::Async
            }
            TokenKind::Ident(name) if name == "partial" => {
                if !matches!(
                    self.peek_kind(1),
                    TokenKind::Keyword(KeywordId::Class | KeywordId::Struct | KeywordId::Interface | KeywordId::Void)
                ) {
                    return None;
                }
                Modifier::Partial
            }
            _ => return None,
        };
        Some(modifier)
    }

    /// `ref struct` / `ref partial struct`
    fn ref_struct_follows(&self) -> bool {
        match self.peek_kind(1) {
            TokenKind::Keyword(KeywordId::Struct) => true,
            TokenKind::Ident(name) => name == "partial" && self.peek_kind(2).is_keyword(KeywordId::Struct),
            _ => false,
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn class_members(&mut self) -> Vec<Spanned<MemberDecl>> {
        let mut members = Vec::new();
        while !self.is_at_end() && !self.check_punct(PunctuationId::RBrace) {
            let start_pos = self.pos;
            let start = self.current_span().start;
            match self.member_declaration() {
                Ok(member) => members.push(member),
                Err(e) => {
                    self.report(e);
                    self.synchronize_member(start_pos);
                    let placeholder = MemberDecl {
                        attributes: Vec::new(),
                        modifiers: Vec::new(),
                        kind: MemberKind::Error,
                    };
                    members.push(Spanned::new(placeholder, self.span_from(start)));
                }
            }
        }
        members
    }

    /// One member of a class, struct or interface body.
    ///
    /// Nested types keep their attributes and modifiers on the inner [`TypeDecl`].
    fn member_declaration(&mut self) -> PResult<Spanned<MemberDecl>> {
        let start = self.current_span().start;
        let attributes = self.attribute_sections()?;
        let modifiers = self.modifiers();

        if self.at_type_declaration() {
            let decl = self.type_declaration(attributes, modifiers)?;
            let member = MemberDecl {
                attributes: Vec::new(),
                modifiers: Vec::new(),
                kind: MemberKind::NestedType(decl),
            };
            return Ok(Spanned::new(member, self.span_from(start)));
        }

        let kind = self.nested(|p| p.member_kind())?;
        Ok(Spanned::new(
            MemberDecl {
                attributes,
                modifiers,
                kind,
            },
            self.span_from(start),
        ))
    }

    fn member_kind(&mut self) -> PResult<MemberKind> {
        match self.peek().kind.clone() {
            TokenKind::Keyword(KeywordId::Const) => {
                self.advance();
                let ty = self.parse_type(TypeMode::Normal)?;
                let name = self.identifier_spanned()?;
                let declarators = self.variable_declarators(name)?;
                self.expect_semicolon();
                return Ok(MemberKind::Constant(FieldDecl { ty, declarators }));
            }
            TokenKind::Keyword(KeywordId::Event) => return self.event_declaration(),
            TokenKind::Keyword(KeywordId::Fixed) => return self.fixed_buffer_declaration(),
            TokenKind::Keyword(id @ (KeywordId::Implicit | KeywordId::Explicit)) => {
                self.advance();
                self.expect_keyword(KeywordId::Operator)?;
                let target = self.parse_type(TypeMode::Normal)?;
                let params = self.required_parameter_list()?;
                let body = self.method_body()?;
                return Ok(MemberKind::Conversion(ConversionDecl {
                    implicit: id == KeywordId::Implicit,
                    target,
                    params,
                    body,
                }));
            }
            TokenKind::Operator(OperatorId::Tilde) => {
                self.advance();
                let name = self.identifier()?;
                self.expect_punct(PunctuationId::LParen)?;
                self.expect_punct(PunctuationId::RParen)?;
                let body = self.method_body()?;
                return Ok(MemberKind::Destructor(DestructorDecl { name, body }));
            }
            TokenKind::Ident(_) if self.peek_kind(1).is_punctuation(PunctuationId::LParen) => {
                return self.constructor_declaration();
            }
            _ => {}
        }

        match self.member_start() {
            Some(MemberStart::Named { ty, name, name_span }) => self.named_member(ty, name, name_span),
            Some(MemberStart::Indexer { ty, interface }) => self.indexer_declaration(ty, interface),
            Some(MemberStart::Operator { ty }) => self.operator_declaration(ty),
            None => Err(self.unexpected(&["member declaration"])),
        }
    }

    /// `fixed T a[n], b[m];`
    fn fixed_buffer_declaration(&mut self) -> PResult<MemberKind> {
        self.expect_keyword(KeywordId::Fixed)?;
        let ty = self.parse_type(TypeMode::Normal)?;
        let mut declarators = Vec::new();
        loop {
            let start = self.current_span().start;
            let name = self.identifier()?;
            self.expect_punct(PunctuationId::LBracket)?;
            let size = self.expression()?;
            self.expect_punct(PunctuationId::RBracket)?;
            declarators.push(Spanned::new(FixedBufferDeclarator { name, size }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_semicolon();
        Ok(MemberKind::FixedBuffer(FixedBufferDecl { ty, declarators }))
    }

    /// Speculatively read the type and name that start most members.
    fn member_start(&mut self) -> Option<MemberStart> {
        self.speculate(Rule::MemberHead, |p| {
            let ty = p.declaration_type()?;
            if p.check_keyword(KeywordId::Operator) {
                return Ok(MemberStart::Operator { ty });
            }
            if p.check_keyword(KeywordId::This) {
                p.advance();
                return p.indexer_follows(MemberStart::Indexer { ty, interface: None });
            }

            let mut segments = Vec::new();
            loop {
                let name_start = p.current_span().start;
                let name = p.identifier()?;
                let name_span = p.span_from(name_start);
                let qualifier_args = p.interface_type_args();
                if !p.check_punct(PunctuationId::Dot) {
                    let interface = if segments.is_empty() {
                        None
                    } else {
                        Some(TypeName { alias: None, segments })
                    };
                    let follows = matches!(
                        p.peek_kind(0),
                        TokenKind::Punctuation(
                            PunctuationId::LParen
                                | PunctuationId::LBrace
                                | PunctuationId::FatArrow
                                | PunctuationId::Semicolon
                                | PunctuationId::Comma
                        ) | TokenKind::Operator(OperatorId::Lt | OperatorId::Eq)
                    );
                    if !follows {
                        return Err(p.unexpected(&["`(`", "`{`", "`;`", "`=`"]));
                    }
                    return Ok(MemberStart::Named {
                        ty,
                        name: MemberName { interface, name },
                        name_span,
                    });
                }
                p.advance();
                segments.push(NameSegment {
                    name,
                    type_args: qualifier_args,
                });
                if p.match_keyword(KeywordId::This) {
                    return p.indexer_follows(MemberStart::Indexer {
                        ty,
                        interface: Some(TypeName { alias: None, segments }),
                    });
                }
            }
        })
    }

    fn indexer_follows(&self, start: MemberStart) -> PResult<MemberStart> {
        if self.check_punct(PunctuationId::LBracket) {
            Ok(start)
        } else {
            Err(self.unexpected(&["`[`"]))
        }
    }

    /// Type arguments of an interface qualifier (`IList<T>.`); method type parameters are left alone.
    fn interface_type_args(&mut self) -> Vec<Spanned<Type>> {
        if !self.check_op(OperatorId::Lt) {
            return Vec::new();
        }
        self.speculate(Rule::InterfaceTypeArgs, |p| {
            let args = p.type_argument_list()?;
            if p.check_punct(PunctuationId::Dot) {
                Ok(args)
            } else {
                Err(p.unexpected(&["`.`"]))
            }
        })
        .unwrap_or_default()
    }

    /// Field, property or method after its type and name.
    fn named_member(&mut self, ty: Spanned<Type>, name: MemberName, name_span: Span) -> PResult<MemberKind> {
        if self.check_punct(PunctuationId::LParen) || self.check_op(OperatorId::Lt) {
            return Ok(MemberKind::Method(self.method_rest(ty, name)?));
        }
        if self.check_punct(PunctuationId::LBrace) {
            let accessors = self.accessor_list()?;
            let initializer = if self.match_op(OperatorId::Eq) {
                let value = self.variable_initializer()?;
                self.expect_semicolon();
                Some(value)
            } else {
                None
            };
            return Ok(MemberKind::Property(PropertyDecl {
                ty,
                name,
                body: PropertyBody::Accessors(accessors),
                initializer,
            }));
        }
        if self.match_punct(PunctuationId::FatArrow) {
            let value = self.expression()?;
            self.expect_semicolon();
            return Ok(MemberKind::Property(PropertyDecl {
                ty,
                name,
                body: PropertyBody::Expr(value),
                initializer: None,
            }));
        }

        if name.interface.is_some() {
            return Err(SyntaxError::syntax("a field cannot have an interface-qualified name", name_span));
        }
        let declarators = self.variable_declarators(Spanned::new(name.name, name_span))?;
        self.expect_semicolon();
        Ok(MemberKind::Field(FieldDecl { ty, declarators }))
    }

    /// Type parameters, parameters, constraints and body of a method or local function.
    fn method_rest(&mut self, return_type: Spanned<Type>, name: MemberName) -> PResult<MethodDecl> {
        let type_params = self.optional_type_parameters()?;
        let params = self.required_parameter_list()?;
        let constraints = self.constraint_clauses()?;
        let body = self.method_body()?;
        Ok(MethodDecl {
            return_type,
            name,
            type_params,
            params,
            constraints,
            body,
        })
    }

    fn constructor_declaration(&mut self) -> PResult<MemberKind> {
        let name = self.identifier()?;
        let params = self.required_parameter_list()?;
        let initializer = if self.check_punct(PunctuationId::Colon) {
            let start = self.advance().span.start;
            let target = if self.match_keyword(KeywordId::Base) {
                InitializerTarget::Base
            } else {
                self.expect_keyword(KeywordId::This)?;
                InitializerTarget::This
            };
            if !self.check_punct(PunctuationId::LParen) {
                return Err(self.unexpected(&["`(`"]));
            }
            let args = self.argument_list(PunctuationId::RParen)?;
            Some(Spanned::new(ConstructorInitializer { target, args }, self.span_from(start)))
        } else {
            None
        };
        let body = self.method_body()?;
        Ok(MemberKind::Constructor(ConstructorDecl {
            name,
            params,
            initializer,
            body,
        }))
    }

    fn indexer_declaration(&mut self, ty: Spanned<Type>, interface: Option<TypeName>) -> PResult<MemberKind> {
        let params = self.parameter_list(PunctuationId::RBracket)?;
        let body = if self.match_punct(PunctuationId::FatArrow) {
            let value = self.expression()?;
            self.expect_semicolon();
            PropertyBody::Expr(value)
        } else {
            PropertyBody::Accessors(self.accessor_list()?)
        };
        Ok(MemberKind::Indexer(IndexerDecl {
            ty,
            interface,
            params,
            body,
        }))
    }

    fn operator_declaration(&mut self, return_type: Spanned<Type>) -> PResult<MemberKind> {
        self.expect_keyword(KeywordId::Operator)?;
        let op = self.overloadable_operator()?;
        let params = self.required_parameter_list()?;
        let body = self.method_body()?;
        Ok(MemberKind::Operator(OperatorDecl {
            return_type,
            op,
            params,
            body,
        }))
    }

    fn overloadable_operator(&mut self) -> PResult<OverloadableOp> {
        if self.at_shift_right() {
            self.advance();
            self.advance();
            return Ok(OverloadableOp::Shr);
        }
        let op = match &self.peek().kind {
            TokenKind::Keyword(KeywordId::True) => OverloadableOp::True,
            TokenKind::Keyword(KeywordId::False) => OverloadableOp::False,
            TokenKind::Operator(id) => match id {
                OperatorId::Plus => OverloadableOp::Plus,
                OperatorId::Minus => OverloadableOp::Minus,
                OperatorId::Bang => OverloadableOp::Not,
                OperatorId::Tilde => OverloadableOp::BitNot,
                OperatorId::PlusPlus => OverloadableOp::Increment,
                OperatorId::MinusMinus => OverloadableOp::Decrement,
                OperatorId::Star => OverloadableOp::Mul,
                OperatorId::Slash => OverloadableOp::Div,
                OperatorId::Percent => OverloadableOp::Mod,
                OperatorId::Amp => OverloadableOp::BitAnd,
                OperatorId::Pipe => OverloadableOp::BitOr,
                OperatorId::Caret => OverloadableOp::BitXor,
                OperatorId::Shl => OverloadableOp::Shl,
                OperatorId::EqEq => OverloadableOp::Eq,
                OperatorId::NotEq => OverloadableOp::NotEq,
                OperatorId::Lt => OverloadableOp::Lt,
                OperatorId::Gt => OverloadableOp::Gt,
                OperatorId::LtEq => OverloadableOp::LtEq,
                OperatorId::GtEq => OverloadableOp::GtEq,
                _ => return Err(self.unexpected(&["overloadable operator"])),
            },
            _ => return Err(self.unexpected(&["overloadable operator"])),
        };
        self.advance();
        Ok(op)
    }

    /// `event T Name;`, `event T A, B;` or `event T Name { add {...} remove {...} }`.
    fn event_declaration(&mut self) -> PResult<MemberKind> {
        self.expect_keyword(KeywordId::Event)?;
        let ty = self.parse_type(TypeMode::Normal)?;
        let name_start = self.current_span().start;
        let first = self.identifier()?;

        if self.check_punct(PunctuationId::Dot) || self.check_punct(PunctuationId::LBrace) {
            let mut segments = Vec::new();
            let mut name = first;
            while self.match_punct(PunctuationId::Dot) {
                segments.push(NameSegment {
                    name,
                    type_args: Vec::new(),
                });
                name = self.identifier()?;
            }
            let interface = if segments.is_empty() {
                None
            } else {
                Some(TypeName { alias: None, segments })
            };
            let accessors = self.accessor_list()?;
            return Ok(MemberKind::EventWithAccessors(EventDecl {
                ty,
                name: MemberName { interface, name },
                accessors,
            }));
        }

        let declarators = self.variable_declarators(Spanned::new(first, self.span_from(name_start)))?;
        self.expect_semicolon();
        Ok(MemberKind::Event(FieldDecl { ty, declarators }))
    }

    /// `{ get; private set; init => x = value; add { } remove { } }`
    fn accessor_list(&mut self) -> PResult<Vec<Spanned<Accessor>>> {
        self.expect_punct(PunctuationId::LBrace)?;
        let mut accessors = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let attributes = self.attribute_sections()?;
            let modifiers = self.modifiers();
            let kind = match self.peek().ident() {
                Some("get") => AccessorKind::Get,
                Some("set") => AccessorKind::Set,
                Some("init") => AccessorKind::Init,
                Some("add") => AccessorKind::Add,
                Some("remove") => AccessorKind::Remove,
                _ => return Err(self.unexpected(&["`get`", "`set`", "`init`", "`add`", "`remove`"])),
            };
            self.advance();
            let body = self.method_body()?;
            accessors.push(Spanned::new(
                Accessor {
                    attributes,
                    modifiers,
                    kind,
                    body,
                },
                self.span_from(start),
            ));
        }
        self.expect_closing(PunctuationId::RBrace)?;
        Ok(accessors)
    }

    /// `{ ... }`, `=> expr;` or `;`
    fn method_body(&mut self) -> PResult<MethodBody> {
        if self.check_punct(PunctuationId::LBrace) {
            return Ok(MethodBody::Block(self.block()?));
        }
        if self.match_punct(PunctuationId::FatArrow) {
            let value = self.expression()?;
            self.expect_semicolon();
            return Ok(MethodBody::Expr(value));
        }
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(MethodBody::None);
        }
        Err(self.unexpected(&["`{`", "`=>`", "`;`"]))
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    fn required_parameter_list(&mut self) -> PResult<Vec<Spanned<Param>>> {
        if !self.check_punct(PunctuationId::LParen) {
            return Err(self.unexpected(&["`(`"]));
        }
        self.parameter_list(PunctuationId::RParen)
    }

    /// `(params)` or `[params]`; the opener is the current token.
    fn parameter_list(&mut self, close: PunctuationId) -> PResult<Vec<Spanned<Param>>> {
        self.advance();
        let mut params = Vec::new();
        if !self.check_punct(close) {
            loop {
                params.push(self.parameter()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(close)?;
        Ok(params)
    }

    fn parameter(&mut self) -> PResult<Spanned<Param>> {
        let start = self.current_span().start;
        let attributes = self.attribute_sections()?;
        let modifier = self.param_modifier();
        let ty = self.parse_type(TypeMode::Normal)?;
        let name = self.identifier()?;
        let default = if self.match_op(OperatorId::Eq) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Spanned::new(
            Param {
                attributes,
                modifier,
                ty,
                name,
                default,
            },
            self.span_from(start),
        ))
    }

    /// Consume a `ref` / `out` / `in` / `this` / `params` parameter modifier if present.
    fn param_modifier(&mut self) -> Option<ParamModifier> {
        let modifier = match self.peek().kind.keyword_id()? {
            KeywordId::Ref => ParamModifier::Ref,
            KeywordId::Out => ParamModifier::Out,
            KeywordId::In => ParamModifier::In,
            KeywordId::This => ParamModifier::This,
            KeywordId::Params => ParamModifier::Params,
            _ => return None,
        };
        self.advance();
        Some(modifier)
    }
}

fn describe_body(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Class => "a class",
        ClassKind::Struct => "a struct",
        ClassKind::Interface => "an interface",
    }
}

/// What follows the type at the start of a member.
enum MemberStart {
    /// `T Name` or `T IFoo.Name`.
    Named {
        ty: Spanned<Type>,
        name: MemberName,
        name_span: Span,
    },
    /// `T this[` or `T IFoo.this[`.
    Indexer {
        ty: Spanned<Type>,
        interface: Option<TypeName>,
    },
    /// `T operator`
    Operator { ty: Spanned<Type> },
}
