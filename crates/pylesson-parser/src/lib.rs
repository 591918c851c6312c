pub mod expr;
pub mod grammar;
pub mod literal;
pub mod parser;
pub mod rules;

pub use grammar::{Grammar, PrintShape, Rule};
pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use pylesson_lexer::Lexer;
    use pylesson_syntax::ast::*;

    fn parse_with(input: &str, grammar: &Grammar) -> Program {
        let lines = Lexer::new(input).tokenize();
        let mut parser = Parser::new(lines, grammar);
        parser.parse_program().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Program {
        parse_with(input, &Grammar::full())
    }

    fn stmts(input: &str) -> Vec<Stmt> {
        parse_program_str(input).items.into_iter().map(|i| i.stmt).collect()
    }

    fn single(input: &str) -> Stmt {
        let mut all = stmts(input);
        assert_eq!(all.len(), 1, "expected one statement for: {}", input);
        all.remove(0)
    }

    fn str_(s: &str) -> Scalar {
        Scalar::Str(s.to_string())
    }

    #[test]
    fn test_scalar_classification() {
        use literal::parse_scalar;
        assert_eq!(parse_scalar("'red'"), Some(str_("red")));
        assert_eq!(parse_scalar("\"blue\""), Some(str_("blue")));
        assert_eq!(parse_scalar("42"), Some(Scalar::Int(42)));
        assert_eq!(parse_scalar("-7"), Some(Scalar::Int(-7)));
        assert_eq!(parse_scalar("3.5"), Some(Scalar::Float(3.5)));
        assert_eq!(parse_scalar(".5"), Some(Scalar::Float(0.5)));
        assert_eq!(parse_scalar("True"), Some(Scalar::Word("True".to_string())));
        assert_eq!(parse_scalar("inf"), Some(Scalar::Word("inf".to_string())));
        assert_eq!(parse_scalar("  "), None);
        assert_eq!(parse_scalar("99999999999999999999"), Some(Scalar::Word("99999999999999999999".to_string())));
    }

    #[test]
    fn test_unquote_decodes_escapes() {
        use literal::unquote;
        assert_eq!(unquote(r"'it\'s'"), Some("it's".to_string()));
        assert_eq!(unquote(r#""say \"hi\"""#), Some("say \"hi\"".to_string()));
        assert_eq!(unquote(r"'a\\b\nc\td'"), Some("a\\b\nc\td".to_string()));
        assert_eq!(unquote(r"'\d'"), Some("\\d".to_string()));
        // two strings are not one literal
        assert_eq!(unquote(r#""a" + "b""#), None);
        assert_eq!(unquote("'open"), None);
    }

    #[test]
    fn test_tuple_list_set_literals() {
        assert!(matches!(
            single("t = (1, 2, \"a\")"),
            Stmt::Assign { value: Literal::Tuple(items), .. } if items == vec![Scalar::Int(1), Scalar::Int(2), str_("a")]
        ));
        assert!(matches!(
            single("l = []"),
            Stmt::Assign { value: Literal::List(items), .. } if items.is_empty()
        ));
        assert!(matches!(
            single("one = (5,)"),
            Stmt::Assign { value: Literal::Tuple(items), .. } if items == vec![Scalar::Int(5)]
        ));
        // parentheses around one value do not make a tuple
        assert!(stmts("t = (\"a\")").is_empty());
        assert!(matches!(
            single("s = {\"red\", \"blue\", \"red\"}"),
            Stmt::Assign { value: Literal::Set(items), .. } if items == vec![str_("red"), str_("blue")]
        ));
        assert!(matches!(
            single("s = set()"),
            Stmt::Assign { value: Literal::Set(items), .. } if items.is_empty()
        ));
    }

    #[test]
    fn test_empty_braces_are_a_dict() {
        assert!(matches!(
            single("d = {}"),
            Stmt::Assign { value: Literal::Dict(entries), .. } if entries.is_empty()
        ));
    }

    #[test]
    fn test_dict_literal_with_nested_list() {
        let stmt = single(r#"classroom = {"teacher": "Ms. Smith", "students": ["Alex", "Sam", "Jordan"]}"#);
        if let Stmt::Assign { name, value: Literal::Dict(entries) } = stmt {
            assert_eq!(name, "classroom");
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0], (str_("teacher"), Entry::Scalar(str_("Ms. Smith"))));
            assert_eq!(
                entries[1],
                (str_("students"), Entry::List(vec![str_("Alex"), str_("Sam"), str_("Jordan")]))
            );
        } else {
            panic!("Expected dict assignment");
        }
    }

    #[test]
    fn test_dict_repeated_key_keeps_first_position() {
        let stmt = single("d = {'a': 1, 'b': 2, 'a': 3}");
        if let Stmt::Assign { value: Literal::Dict(entries), .. } = stmt {
            assert_eq!(entries[0], (str_("a"), Entry::Scalar(Scalar::Int(3))));
            assert_eq!(entries.len(), 2);
        } else {
            panic!("Expected dict assignment");
        }
    }

    #[test]
    fn test_dict_key_vocabulary() {
        let grammar = Grammar::full().with_dict_keys(&["name", "age"]);
        let program = parse_with("hero = {\"name\": \"Zed\", \"mana\": 5, \"age\": 12}", &grammar);
        if let Stmt::Assign { value: Literal::Dict(entries), .. } = &program.items[0].stmt {
            let keys: Vec<&Scalar> = entries.iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec![&str_("name"), &str_("age")]);
        } else {
            panic!("Expected dict assignment");
        }
    }

    #[test]
    fn test_multi_line_literal() {
        let src = "player = {\n    \"name\": \"Zed\",  # the hero\n    \"items\": [\"sword\",\n              \"shield\"],\n}\nprint(player)";
        let program = parse_program_str(src);
        assert_eq!(program.items.len(), 2);
        assert_eq!(program.items[0].line, 1);
        assert_eq!(program.items[1].line, 6);
        if let Stmt::Assign { value: Literal::Dict(entries), .. } = &program.items[0].stmt {
            assert_eq!(entries[1].1, Entry::List(vec![str_("sword"), str_("shield")]));
        } else {
            panic!("Expected dict assignment");
        }
    }

    #[test]
    fn test_unterminated_literal_is_a_fault() {
        let lines = Lexer::new("print(\"hi\")\nd = {\n  \"a\": 1,").tokenize();
        let grammar = Grammar::full();
        let err = Parser::new(lines, &grammar).parse_program().unwrap_err();
        assert!(err.msg.contains("never closed"));
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_dict_keys_keep_their_type() {
        let stmt = single("d = {1: \"a\", \"1\": \"b\", 2.5: (\"x\")}");
        if let Stmt::Assign { value: Literal::Dict(entries), .. } = stmt {
            let keys: Vec<Scalar> = entries.iter().map(|(k, _)| k.clone()).collect();
            assert_eq!(keys, vec![Scalar::Int(1), str_("1"), Scalar::Float(2.5)]);
            assert_eq!(entries[2].1, Entry::Scalar(str_("x")));
        } else {
            panic!("Expected dict assignment");
        }
        // a vocabulary only admits the keys it names
        let grammar = Grammar::full().with_dict_keys(&["name"]);
        let program = parse_with("d = {1: \"a\", \"name\": \"b\"}", &grammar);
        assert!(matches!(&program.items[0].stmt, Stmt::Assign { value: Literal::Dict(entries), .. } if entries.len() == 1));
    }

    #[test]
    fn test_literal_line_cap() {
        let grammar = Grammar::full();
        let fits = format!("big = [\n{}]\nprint(big)", "1,\n".repeat(rules::MAX_LITERAL_LINES - 1));
        let program = Parser::new(Lexer::new(&fits).tokenize(), &grammar).parse_program().unwrap();
        assert_eq!(program.items.len(), 2);

        let too_long = format!("big = [\n{}]", "1,\n".repeat(rules::MAX_LITERAL_LINES + 5));
        let err = Parser::new(Lexer::new(&too_long).tokenize(), &grammar).parse_program().unwrap_err();
        assert!(err.msg.contains("spans more than"));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_too_many_elements_is_a_fault() {
        let body = vec!["1"; literal::MAX_LITERAL_ELEMENTS + 1].join(", ");
        let lines = Lexer::new(&format!("big = [{}]", body)).tokenize();
        let grammar = Grammar::full();
        assert!(Parser::new(lines, &grammar).parse_program().is_err());
    }

    #[test]
    fn test_mutations() {
        assert!(matches!(single("fruits.append(\"kiwi\")"), Stmt::Append { name, item } if name == "fruits" && item == str_("kiwi")));
        assert!(matches!(single("colors.add('green')"), Stmt::Add { item, .. } if item == str_("green")));
        assert!(matches!(single("colors.remove('red')"), Stmt::Remove { item, .. } if item == str_("red")));
        assert!(matches!(single("del d[\"a\"]"), Stmt::DeleteKey { key: Key::Str(k), .. } if k == "a"));
        assert!(matches!(single("del d"), Stmt::DeleteVar { name } if name == "d"));
        assert!(stmts("fruits.append()").is_empty());
    }

    #[test]
    fn test_set_item() {
        assert!(matches!(
            single("d[\"b\"] = 2"),
            Stmt::SetItem { key: Key::Str(k), value: Entry::Scalar(Scalar::Int(2)), .. } if k == "b"
        ));
        assert!(matches!(
            single("inventory['potions'] = ['red', 'blue']"),
            Stmt::SetItem { value: Entry::List(items), .. } if items.len() == 2
        ));
        assert!(matches!(single("nums[0] = 9"), Stmt::SetItem { key: Key::Int(0), .. }));
        // comparisons are not assignments
        assert!(stmts("d[\"b\"] == 2").is_empty());
    }

    #[test]
    fn test_for_loops() {
        let stmt = single("for k, v in d.items():\n    print(k, v)");
        if let Stmt::For { targets, iter, view, body } = stmt {
            assert_eq!(targets, vec!["k".to_string(), "v".to_string()]);
            assert_eq!(iter, "d");
            assert_eq!(view, Some(DictView::Items));
            assert_eq!(body, vec![Stmt::Print(vec![Expr::Var("k".into()), Expr::Var("v".into())])]);
        } else {
            panic!("Expected for loop");
        }

        assert!(matches!(single("for v in d.values():\n  print(v)"), Stmt::For { view: Some(DictView::Values), .. }));
        assert!(matches!(single("for k in d:\n  print(k)"), Stmt::For { view: None, .. }));
        assert!(matches!(single("for k in d: print(k)"), Stmt::For { body, .. } if body.len() == 1));
        // items() needs two targets, two targets need items()
        let is_loop = |s: &Stmt| matches!(s, Stmt::For { .. });
        assert!(!stmts("for k in d.items():\n  print(k)").iter().any(is_loop));
        assert!(!stmts("for k, v in d:\n  print(k)").iter().any(is_loop));
    }

    #[test]
    fn test_unrecognised_block_skips_its_body() {
        let program = parse_program_str("for i in range(3):\n    print(\"hi\")\n    print(i)\nprint(\"done\")");
        assert_eq!(program.items.len(), 1);
        assert_eq!(program.items[0].line, 4);
        assert!(stmts("for k in d.items():\n  print(k)").is_empty());
        assert!(stmts("if x:\n  print(x)\nwhile True:\n\tprint(1)").is_empty());
    }

    #[test]
    fn test_loop_body_cap() {
        let body = "    print(k)\n".repeat(rules::MAX_LOOP_BODY_LINES + 5);
        let program = parse_program_str(&format!("for k in d:\n{}print(\"after\")", body));
        assert_eq!(program.items.len(), 2);
        if let Stmt::For { body, .. } = &program.items[0].stmt {
            assert_eq!(body.len(), rules::MAX_LOOP_BODY_LINES);
        } else {
            panic!("Expected for loop");
        }
        assert_eq!(program.items[1].line, rules::MAX_LOOP_BODY_LINES + 7);
    }

    #[test]
    fn test_loop_body_is_consumed() {
        let program = parse_program_str("for k in d:\n    x = [1]\n    print(f\"{k}!\")\nprint(\"after\")");
        assert_eq!(program.items.len(), 2);
        if let Stmt::For { body, .. } = &program.items[0].stmt {
            assert_eq!(body.len(), 1);
        } else {
            panic!("Expected for loop");
        }
        assert_eq!(program.items[1].line, 4);
    }

    #[test]
    fn test_print_shapes() {
        let print = |src: &str| match single(src) {
            Stmt::Print(args) => args,
            other => panic!("Expected print, got {:?}", other),
        };
        assert_eq!(print("print(\"hello\")"), vec![Expr::Literal(str_("hello"))]);
        assert_eq!(print("print(t)"), vec![Expr::Var("t".into())]);
        assert_eq!(print("print(t[-1])"), vec![Expr::Index { name: "t".into(), key: Key::Int(-1) }]);
        assert_eq!(
            print("print(c[\"students\"][0])"),
            vec![Expr::Nested { name: "c".into(), key: Key::Str("students".into()), index: 0 }]
        );
        assert!(matches!(&print("print(len(c[\"students\"]))")[0], Expr::Len(inner) if matches!(**inner, Expr::Index { .. })));
        assert_eq!(
            print("print(\"red\" not in colors)"),
            vec![Expr::Contains { needle: str_("red"), name: "colors".into(), negated: true }]
        );
        assert_eq!(
            print("print(d.get(\"x\", 0))"),
            vec![Expr::Get { name: "d".into(), key: Key::Str("x".into()), default: Some(Scalar::Int(0)) }]
        );
        assert_eq!(print("print(d.items())"), vec![Expr::View { name: "d".into(), view: DictView::Items }]);
        assert!(print("print()").is_empty());
        assert_eq!(print("print(\"Total:\", len(d))").len(), 2);
    }

    #[test]
    fn test_fstring_placeholders() {
        let stmt = single("print(f\"{name} has {{braces}} and {len(items)} items\")");
        if let Stmt::Print(args) = stmt {
            if let Expr::FString(parts) = &args[0] {
                assert_eq!(parts[0], FPart::Expr(Expr::Var("name".into())));
                assert_eq!(parts[1], FPart::Text(" has {braces} and ".into()));
                assert!(matches!(&parts[2], FPart::Expr(Expr::Len(_))));
                assert_eq!(parts[3], FPart::Text(" items".into()));
            } else {
                panic!("Expected f-string");
            }
        } else {
            panic!("Expected print");
        }
        // format specs are outside the grammar
        assert!(stmts("print(f\"{x:>5}\")").is_empty());
    }

    #[test]
    fn test_disabled_shapes_make_print_unrecognised() {
        let grammar = Grammar::with(&[Rule::Assign, Rule::Print], &[PrintShape::Whole]);
        let program = parse_with("t = (1, 2)\nprint(t)\nprint(t[0])\nprint(\"hi\")\nprint(\"t:\", t)", &grammar);
        assert_eq!(program.items.len(), 2);
    }

    #[test]
    fn test_disabled_rules_skip_lines() {
        let grammar = Grammar::with(&[Rule::Assign, Rule::Print], &PrintShape::ALL);
        let program = parse_with("s = {1}\ns.add(2)\nfor x in s:\n    print(x)\nprint(s)", &grammar);
        let kinds: Vec<bool> = program.items.iter().map(|i| matches!(i.stmt, Stmt::Print(_))).collect();
        // the loop is skipped together with its body
        assert_eq!(kinds, vec![false, true]);
    }

    #[test]
    fn test_unrecognised_lines_are_skipped() {
        assert!(stmts("import os\nx = 5\nprint x\nwhile True:\n    print(x)\nprint(t").is_empty());
        // comprehension text is kept verbatim as a single element
        assert!(matches!(
            single("squares = [x * x for x in range(5)]"),
            Stmt::Assign { value: Literal::List(items), .. } if items == vec![Scalar::Word("x * x for x in range(5)".into())]
        ));
    }

    #[test]
    fn test_grammar_from_json() {
        let grammar: Grammar = serde_json::from_str(r#"{"rules": ["assign", "print"], "print_shapes": ["whole", "f_string"]}"#).unwrap();
        assert!(grammar.allows(Rule::Assign));
        assert!(!grammar.allows(Rule::ForLoop));
        assert!(grammar.allows_shape(PrintShape::FString));
        assert!(grammar.knows_key("anything"));
    }
}
