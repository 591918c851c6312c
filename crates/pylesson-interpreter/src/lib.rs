//! Executes recognised statements against a per-run environment and
//! collects what `print` would have shown in Python.

pub mod display;
pub mod env;
pub mod interpreter;
pub mod value;

pub use env::{Binding, Env};
pub use interpreter::{Interpreter, KeyMissPolicy, MAX_OUTPUT_BYTES};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use pylesson_lexer::Lexer;
    use pylesson_parser::{Grammar, Parser};
    use pylesson_syntax::ast::Scalar;

    fn run_with(input: &str, policy: KeyMissPolicy) -> Result<Vec<String>, String> {
        let lines = Lexer::new(input).tokenize();
        let grammar = Grammar::full();
        let program = Parser::new(lines, &grammar)
            .parse_program()
            .map_err(|e| format!("Parse error: {}", e))?;
        let mut interpreter = Interpreter::new(policy);
        interpreter
            .run(&program)
            .map_err(|e| format!("Runtime error: {}", e))?;
        Ok(interpreter.take_output())
    }

    fn run_lines(input: &str) -> Vec<String> {
        match run_with(input, KeyMissPolicy::KeyError) {
            Ok(lines) => lines,
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_output(input: &str, expected: &[&str]) {
        assert_eq!(run_lines(input), expected, "Program: {}", input);
    }

    #[test]
    fn test_container_repr() {
        expect_output("t = (1, 2, \"a\")\nprint(t)", &["(1, 2, 'a')"]);
        expect_output("t = (\"solo\",)\nprint(t)", &["('solo',)"]);
        expect_output("l = [1.0, 2.5, True]\nprint(l)", &["[1.0, 2.5, True]"]);
        expect_output("s = {\"red\", \"blue\", \"red\"}\nprint(s)", &["{'red', 'blue'}"]);
        expect_output("s = set()\nprint(s)", &["set()"]);
        expect_output("d = {}\nprint(d)", &["{}"]);
        expect_output(
            "d = {\"name\": \"Zed\", \"items\": [\"sword\", \"bow\"], \"pos\": (1, 2)}\nprint(d)",
            &["{'name': 'Zed', 'items': ['sword', 'bow'], 'pos': (1, 2)}"],
        );
        expect_output("s = [\"it's\"]\nprint(s)", &["[\"it's\"]"]);
    }

    #[test]
    fn test_float_repr() {
        use display::float_repr;
        assert_eq!(float_repr(3.0), "3.0");
        assert_eq!(float_repr(2.5), "2.5");
        assert_eq!(float_repr(-0.0), "-0.0");
        assert_eq!(float_repr(1e20), "1e+20");
        assert_eq!(float_repr(1.5e-7), "1.5e-07");
        assert_eq!(float_repr(0.0001), "0.0001");
    }

    #[test]
    fn test_print_str_semantics() {
        expect_output("print(\"hello\")\nprint(42)\nprint()", &["hello", "42", ""]);
        expect_output("t = (\"a\", \"b\")\nprint(t[0])\nprint(t[-1])", &["a", "b"]);
        expect_output("t = (1, 2)\nprint(\"Tuple:\", t)", &["Tuple: (1, 2)"]);
    }

    #[test]
    fn test_list_and_set_mutation() {
        expect_output("l = [1]\nl.append(2)\nl.append(\"x\")\nprint(l)", &["[1, 2, 'x']"]);
        expect_output(
            "s = {\"red\"}\ns.add(\"blue\")\ns.add(\"red\")\ns.remove(\"red\")\nprint(s)",
            &["{'blue'}"],
        );
        expect_output("nums = [1, 2, 3]\nnums[-1] = 9\nnums[7] = 0\nprint(nums)", &["[1, 2, 9]"]);
    }

    #[test]
    fn test_wrong_kind_is_silent() {
        expect_output("t = (1, 2)\nt.append(3)\nt.add(3)\nprint(t)", &["(1, 2)"]);
        expect_output("s = {1}\ns.remove(5)\nmissing.add(1)\nprint(s)", &["{1}"]);
        expect_output("t = (1, 2)\nprint(t[5])\nprint(t[\"a\"])\nprint(nope)", &[]);
    }

    #[test]
    fn test_dict_set_get_delete() {
        expect_output("d = {\"a\": 1}\nd[\"b\"] = 2\nprint(d[\"b\"])", &["2"]);
        expect_output("d = {\"a\": 1, \"b\": 2}\nd[\"a\"] = 5\nprint(d)", &["{'a': 5, 'b': 2}"]);
        expect_output("d = {\"a\": 1}\ndel d[\"a\"]\ndel d[\"a\"]\nprint(d)", &["{}"]);
        expect_output("d = {\"a\": 1}\ndel d\nprint(d)", &[]);
    }

    #[test]
    fn test_key_miss_policy() {
        let src = "d = {\"a\": 1}\ndel d[\"a\"]\nprint(d[\"a\"])\nprint(\"after\")";
        assert_eq!(run_lines(src), vec!["KeyError: 'a'", "after"]);
        assert_eq!(run_with(src, KeyMissPolicy::Silent).unwrap(), vec!["after"]);
        expect_output("d = {\"a\": 1}\nprint(d[1])", &["KeyError: 1"]);
        expect_output("d = {\"a\": [1]}\nprint(d[\"b\"][0])", &["KeyError: 'b'"]);
    }

    #[test]
    fn test_nested_lookup() {
        let src = r#"classroom = {"teacher": "Ms. Smith", "students": ["Alex", "Sam", "Jordan"]}
print(classroom["students"][0])
print(classroom["students"][-1])
print(len(classroom["students"]))
print(classroom["teacher"])
print(classroom["students"])"#;
        expect_output(src, &["Alex", "Jordan", "3", "Ms. Smith", "['Alex', 'Sam', 'Jordan']"]);
    }

    #[test]
    fn test_len_and_membership() {
        expect_output("s = {1, 2, 2, 3}\nprint(len(s))", &["3"]);
        expect_output(
            "colors = {\"red\", \"blue\"}\nprint(\"red\" in colors)\nprint(\"green\" in colors)\nprint(\"green\" not in colors)",
            &["True", "False", "True"],
        );
        expect_output("d = {\"a\": 1}\nprint(\"a\" in d)\nprint(1 in d)", &["True", "False"]);
    }

    #[test]
    fn test_dict_methods() {
        let src = "d = {\"a\": 1, \"b\": [2]}\nprint(d.get(\"a\"))\nprint(d.get(\"z\"))\nprint(d.get(\"z\", 0))\nprint(d.keys())\nprint(d.values())\nprint(d.items())";
        expect_output(
            src,
            &[
                "1",
                "None",
                "0",
                "dict_keys(['a', 'b'])",
                "dict_values([1, [2]])",
                "dict_items([('a', 1), ('b', [2])])",
            ],
        );
    }

    #[test]
    fn test_for_loops() {
        expect_output(
            "d = {\"x\": 1, \"y\": 2}\nfor k, v in d.items():\n    print(k, v)",
            &["x 1", "y 2"],
        );
        expect_output("d = {\"x\": 1, \"y\": 2}\nfor k in d:\n    print(k)\n    print(d[k])", &["x", "1", "y", "2"]);
        expect_output("d = {\"x\": [1]}\nfor v in d.values(): print(v)", &["[1]"]);
        expect_output("d = {\"x\": 1}\nfor k in d.keys():\n  print(f\"{k} = {d[k]}\")", &["x = 1"]);
        expect_output("s = {\"a\", \"b\"}\nfor c in s:\n  print(c)", &["a", "b"]);
        expect_output("t = (1, 2)\nfor v in t.values():\n  print(v)\nfor v in nope:\n  print(v)", &[]);
    }

    #[test]
    fn test_unknown_block_runs_nothing() {
        let src = r#"for i in range(3):
    print("hi")
d = {"a": 1, "b": 2}
for pair in d.items():
    print("pair!")
print("done")"#;
        expect_output(src, &["done"]);
    }

    #[test]
    fn test_string_escapes() {
        let src = r#"print('it\'s')
t = ("a\"b",)
print(t[0])
print(t)
l = ["back\\slash", "tab\there", "\d"]
print(l[0])
print(l[1])
print(l[2])"#;
        expect_output(src, &["it's", "a\"b", "('a\"b',)", "back\\slash", "tab\there", "\\d"]);
    }

    #[test]
    fn test_numeric_dict_keys() {
        let src = "d = {1: \"a\", \"1\": \"b\"}\nprint(d)\nprint(d[1])\nprint(d[\"1\"])\nd[2] = \"c\"\ndel d[1]\nprint(d.keys())\nprint(2 in d)";
        expect_output(src, &["{1: 'a', '1': 'b'}", "a", "b", "dict_keys(['1', 2])", "True"]);
        expect_output("d = {7: \"x\"}\nfor k in d:\n  print(d[k])", &["x"]);
    }

    #[test]
    fn test_huge_integers_print_as_written() {
        expect_output("l = [99999999999999999999, 1]\nprint(l)", &["[99999999999999999999, 1]"]);
    }

    #[test]
    fn test_parenthesised_scalar_is_not_a_tuple() {
        expect_output("t = (\"a\")\nprint(t)", &[]);
        expect_output("d = {\"k\": (\"x\")}\nprint(d)", &["{'k': 'x'}"]);
    }

    #[test]
    fn test_loop_variable_does_not_leak() {
        expect_output("l = [1]\nfor x in l:\n  print(x)\nprint(x)", &["1"]);
    }

    #[test]
    fn test_reassignment_replaces_kind() {
        expect_output("x = [1]\nx = {\"a\": 1}\nx.append(2)\nprint(x)", &["{'a': 1}"]);
    }

    #[test]
    fn test_fstrings() {
        expect_output(
            "hero = {\"name\": \"Zed\", \"items\": [\"a\", \"b\"]}\nprint(f\"{hero['name']} carries {len(hero['items'])} items\")",
            &["Zed carries 2 items"],
        );
        expect_output("d = {}\nprint(f\"{d['gone']}!\")", &["KeyError: 'gone'"]);
    }

    #[test]
    fn test_output_cap_is_a_fault() {
        let long = "x".repeat(1000);
        let src = format!("l = [\"{}\"]\nfor s in l:\n  print(s)\n", long).repeat(70);
        assert!(run_with(&src, KeyMissPolicy::KeyError).is_err());
    }

    #[test]
    fn test_env_scopes() {
        let mut root = Env::new_root();
        root.define("t", Value::Tuple(vec![Scalar::Int(1)]));
        {
            let mut child = root.child();
            child.bind_item("k", pylesson_syntax::ast::Entry::Scalar(Scalar::Int(2)));
            assert!(child.value("t").is_some());
            assert!(child.value("k").is_none());
            assert!(child.get("k").is_some());
        }
        assert!(root.get("k").is_none());
        assert!(root.remove("t").is_some());
        assert!(root.get("t").is_none());
    }

    #[test]
    fn test_idempotent_runs() {
        let src = "s = {\"b\", \"a\"}\ns.add(\"c\")\nprint(s)\nprint(len(s))";
        assert_eq!(run_lines(src), run_lines(src));
    }
}
