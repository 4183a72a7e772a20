mod options;

use std::io::{BufRead, Write};

use itertools::Itertools;
pub use options::SetShellOptions;

use crate::prelude::*;

/// Interprets set commands over a registry of named sets.
///
/// Every command prints its output followed by `ok`. A failed command prints `err`, the
/// error, and then `ok`; failures never end the session.
pub struct SetShell<W: Write> {
    sets: HashMap<String, Set<Element>>,
    config: SetShellOptions,
    out: W,
}

impl SetShell<std::io::Stdout> {
    /// A shell that answers on stdout.
    pub fn stdio(options: SetShellOptions) -> SetShell<std::io::Stdout> {
        SetShell::new(options, std::io::stdout())
    }
}

impl<W: Write> SetShell<W> {
    pub fn new(options: SetShellOptions, out: W) -> SetShell<W> {
        SetShell { sets: HashMap::new(), config: options, out }
    }

    /// Runs commands from `input` until it is exhausted or a `quit` is read.
    pub fn run(&mut self, input: impl BufRead) -> Result<()> {
        for line in input.lines() {
            let cmdstr = line.context("failed to read command")?;

            let args: Vec<&str> = cmdstr.split_whitespace().collect();
            let cmd = *args.first().unwrap_or(&"");

            if !self.apply(cmd, args.get(1..).unwrap_or_default())? {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Runs a command. Returns whether the session continues.
    pub fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<bool> {
        let result = match cmd
        {
            | "" => Ok(()),
            | "add" => self.add(args),
            | "alias" => self.alias(args),
            | "complement" | "intersect" | "union" => self.combine(cmd, args),
            | "contains" => self.contains(args),
            | "copy" => self.copy(args),
            | "drop" => self.drop_set(args),
            | "equals" => self.equals(args),
            | "info" => self.info(),
            | "len" => self.len(args),
            | "new" => self.new_set(args),
            | "powerset" => self.power_set(args),
            | "quit" => return Ok(false),
            | "remove" => self.remove(args),
            | "sets" => self.list_sets(),
            | "show" => self.show(args),
            | "store" => self.store(args),
            | _ => Err(anyhow!("unrecognized command {cmd}")),
        };

        match result
        {
            Ok(_) => {
                log::debug!("Command completed successfully: {cmd} {}", args.join(" "));
                self.ok()?;
            },
            Err(err) => {
                log::warn!("encountered recoverable error:\n{err}");
                self.err(&err)?;
            },
        };
        Ok(true)
    }

    // commands

    fn new_set(&mut self, args: &[&str]) -> Result<()> {
        let name = Self::arg(args, 0, "set name")?;
        let s = Set::new();
        self.print_set(&s)?;
        self.sets.insert(name.to_owned(), s);
        Ok(())
    }

    fn add(&mut self, args: &[&str]) -> Result<()> {
        let s = self.get(Self::arg(args, 0, "set name")?)?.clone();
        // parse everything first so a bad element leaves the set untouched
        let elements = Self::parse_elements(&args[1..])?;
        elements.into_iter().for_each(|e| {
            s.append(e);
        });
        self.print_set(&s)
    }

    fn remove(&mut self, args: &[&str]) -> Result<()> {
        let s = self.get(Self::arg(args, 0, "set name")?)?.clone();
        let elements = Self::parse_elements(&args[1..])?;
        elements.iter().for_each(|e| {
            s.remove(e);
        });
        self.print_set(&s)
    }

    fn contains(&mut self, args: &[&str]) -> Result<()> {
        let s = self.get(Self::arg(args, 0, "set name")?)?;
        let element = Self::arg(args, 1, "element")?.parse::<Element>()?;
        let found = s.contains(&element);
        writeln!(self.out, "{found}")?;
        Ok(())
    }

    fn len(&mut self, args: &[&str]) -> Result<()> {
        let len = self.get(Self::arg(args, 0, "set name")?)?.len();
        writeln!(self.out, "{len}")?;
        Ok(())
    }

    fn show(&mut self, args: &[&str]) -> Result<()> {
        let s = self.get(Self::arg(args, 0, "set name")?)?.clone();
        self.print_set(&s)
    }

    fn equals(&mut self, args: &[&str]) -> Result<()> {
        let a = self.get(Self::arg(args, 0, "first set name")?)?;
        let b = self.get(Self::arg(args, 1, "second set name")?)?;
        let equal = a.equals(b);
        writeln!(self.out, "{equal}")?;
        Ok(())
    }

    fn combine(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        let s = self.evaluate(cmd, args)?;
        self.print_set(&s)
    }

    /// Runs a combining command and keeps its result under a new name.
    fn store(&mut self, args: &[&str]) -> Result<()> {
        let name = Self::arg(args, 0, "target set name")?;
        let cmd = Self::arg(args, 1, "command")?;
        let s = self.evaluate(cmd, &args[2..])?;
        self.print_set(&s)?;
        self.sets.insert(name.to_owned(), s);
        Ok(())
    }

    fn alias(&mut self, args: &[&str]) -> Result<()> {
        let name = Self::arg(args, 0, "new set name")?;
        let s = self.get(Self::arg(args, 1, "existing set name")?)?.clone();
        self.print_set(&s)?;
        self.sets.insert(name.to_owned(), s);
        Ok(())
    }

    fn copy(&mut self, args: &[&str]) -> Result<()> {
        let name = Self::arg(args, 0, "new set name")?;
        let s = self.get(Self::arg(args, 1, "existing set name")?)?.detach();
        self.print_set(&s)?;
        self.sets.insert(name.to_owned(), s);
        Ok(())
    }

    fn drop_set(&mut self, args: &[&str]) -> Result<()> {
        let name = Self::arg(args, 0, "set name")?;
        self.sets.remove(name).map(|_| ()).ok_or_else(|| anyhow!("no set named {name}"))
    }

    fn power_set(&mut self, args: &[&str]) -> Result<()> {
        let s = self.get(Self::arg(args, 0, "set name")?)?.clone();
        let limit = self.config.power_set_limit();
        if s.len() > limit {
            return Err(anyhow!("refusing to enumerate the power set of {} elements; the limit is {limit}", s.len()));
        }

        let subsets = s.power_set()?;
        writeln!(self.out, "{}", subsets.len())?;
        for subset in subsets {
            self.print_set(&subset)?;
        }
        Ok(())
    }

    fn list_sets(&mut self) -> Result<()> {
        let names = self.sets.keys().sorted().join("; ");
        writeln!(self.out, "{names}")?;
        Ok(())
    }

    // evaluation

    /// Computes `union A B [C...]`, `intersect A B` or `complement A B` without storing it.
    fn evaluate(&self, cmd: &str, args: &[&str]) -> Result<Set<Element>> {
        let a = self.get(Self::arg(args, 0, "first set name")?)?;
        let b = self.get(Self::arg(args, 1, "second set name")?)?;
        match cmd {
            "union" => {
                let rest = args[2..].iter().map(|name| self.get(name)).collect::<Result<Vec<_>>>()?;
                Ok(Set::union_many([a, b].into_iter().chain(rest)))
            },
            "intersect" if args.len() == 2 => Ok(a.intersection(b)),
            "complement" if args.len() == 2 => Ok(a.relative_complement(b)),
            "intersect" | "complement" => Err(anyhow!("{cmd} takes exactly 2 sets, received {}", args.len())),
            _ => Err(anyhow!("cannot store the result of {cmd}")),
        }
    }

    // accessors

    fn get(&self, name: &str) -> Result<&Set<Element>> {
        self.sets.get(name).ok_or_else(|| anyhow!("no set named {name}"))
    }

    fn arg<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str> {
        args.get(index).copied().ok_or_else(|| anyhow!("missing {what}"))
    }

    fn parse_elements(args: &[&str]) -> Result<Vec<Element>> {
        args.iter().map(|s| s.parse::<Element>()).collect()
    }

    // basic printers

    /// Prints a set with its elements sorted, so the output is stable across runs.
    fn print_set(&mut self, s: &Set<Element>) -> Result<()> {
        let repr = s.iter().sorted().map(|e| e.notate()).join(", ");
        writeln!(self.out, "[{repr}]")?;
        Ok(())
    }

    /// Prints the shell's ID.
    fn info(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "id {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )?;
        Ok(())
    }

    /// Prints an error to the output stream.
    fn err(&mut self, err: &Error) -> Result<()> {
        writeln!(self.out, "err\n{err}")?;
        self.ok()
    }

    /// Prints the ok footer to the output stream.
    fn ok(&mut self) -> Result<()> {
        writeln!(self.out, "ok")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{SetShell, SetShellOptions};

    /// Feeds a script to a fresh shell and returns everything it printed.
    fn transcript(script: &str) -> String {
        let mut out = vec![];
        SetShell::new(SetShellOptions::default(), &mut out).run(script.as_bytes()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn build_and_compare() {
        let out = transcript(
            "new s\nadd s 1 2 3 a b\nnew t\nadd t b a 3 2 1 1\nequals s t\nadd t c\nequals s t\n",
        );
        assert_eq!(
            out,
            "[]\nok\n[1, 2, 3, a, b]\nok\n[]\nok\n[1, 2, 3, a, b]\nok\ntrue\nok\n[1, 2, 3, a, b, c]\nok\nfalse\nok\n"
        );
    }

    #[test]
    fn complement_is_first_minus_second() {
        let out = transcript("new s\nadd s 1 2 3 a b d\nnew t\nadd t 1 2 3 a b\ncomplement s t\ncomplement t s\n");
        assert!(out.ends_with("[d]\nok\n[]\nok\n"));
    }

    #[test]
    fn union_intersect_and_store() {
        let out = transcript(
            "new a\nadd a 1 2\nnew b\nadd b 2 3\nnew c\nadd c x\nunion a b c\nintersect a b\nstore d union a b\nshow d\nsets\n",
        );
        let lines = out.lines().collect::<Vec<_>>();
        assert!(lines.contains(&"[1, 2, 3, x]"));
        assert!(lines.contains(&"[2]"));
        assert_eq!(lines[lines.len() - 4..], ["[1, 2, 3]", "ok", "a; b; c; d", "ok"]);
    }

    #[test]
    fn alias_shares_and_copy_detaches() {
        let out = transcript("new a\nalias b a\ncopy c a\nadd b 1\nshow a\nshow c\n");
        assert!(out.ends_with("[1]\nok\n[1]\nok\n[]\nok\n"));
    }

    #[test]
    fn strings_that_look_like_integers_stay_quoted() {
        let out = transcript("new a\nadd a 1 \"1\"\nlen a\ncontains a \"1\"\nremove a 1\n");
        assert!(out.contains("[1, \"1\"]"));
        assert!(out.ends_with("2\nok\ntrue\nok\n[\"1\"]\nok\n"));
    }

    #[test]
    fn power_set_listing() {
        let out = transcript("new a\nadd a 1 2\npowerset a\n");
        let lines = out.lines().skip(4).collect::<Vec<_>>();
        assert_eq!(lines[0], "4");
        let mut subsets = lines[1..5].to_vec();
        subsets.sort();
        assert_eq!(subsets, ["[1, 2]", "[1]", "[2]", "[]"]);
        assert_eq!(lines[5], "ok");
    }

    #[test]
    fn power_set_of_string_elements() {
        let words = (0..10).map(|i| format!("w{i}")).join(" ");
        let out = transcript(&format!("new a\nadd a {words} \"1\" \"x\\\"y\"\npowerset a\n"));
        let lines = out.lines().skip(4).collect::<Vec<_>>();
        assert_eq!(lines[0], "4096");
        assert_eq!(lines.len(), 1 + 4096 + 1);
        assert_eq!(lines[4097], "ok");

        let full = lines[1..4097].iter().max_by_key(|line| line.len()).unwrap();
        assert!(full.starts_with("[\"1\", w0, w1, "));
        assert!(full.ends_with(", w9, \"x\\\"y\"]"));
    }

    #[test]
    fn power_set_limit_is_enforced() {
        let mut out = vec![];
        let options = SetShellOptions { max_power_set: 1, ..SetShellOptions::default() };
        SetShell::new(options, &mut out).run("new a\nadd a 1 2\npowerset a\n".as_bytes()).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("err\nrefusing to enumerate the power set of 2 elements; the limit is 1\nok\n"));
    }

    #[test]
    fn errors_are_recoverable() {
        let out = transcript("frobnicate\nshow nope\nnew a\nadd a 1 {bad}\nshow a\nadd\nintersect a a a\n");
        assert_eq!(out.matches("err\n").count(), 5);
        assert!(out.contains("err\nunrecognized command frobnicate\nok\n"));
        assert!(out.contains("err\nno set named nope\nok\n"));
        assert!(out.contains("err\nmissing set name\nok\n"));
        assert!(out.contains("err\nintersect takes exactly 2 sets, received 3\nok\n"));
        // the failed add left the set untouched
        assert!(out.contains("err\ncould not parse element {bad}\nok\n[]\nok\n"));
    }

    #[test]
    fn quit_stops_the_session() {
        let out = transcript("new a\nquit\nshow a\n");
        assert_eq!(out, "[]\nok\n");
    }

    #[test]
    fn drop_forgets_names() {
        let out = transcript("new a\ndrop a\nshow a\ndrop a\n");
        assert_eq!(out, "[]\nok\nok\nerr\nno set named a\nok\nerr\nno set named a\nok\n");
    }

    #[test]
    fn blank_lines_and_info() {
        let out = transcript("\ninfo\n");
        assert!(out.starts_with("ok\nid sets-rs v"));
    }
}
