use aoc_solver::{
    AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError,
    SolverRegistryBuilder,
};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2031, day = 4, tags = ["macro-test", "lines"])]
struct LineCounter;

impl AocParser for LineCounter {
    type SharedData<'a> = Vec<&'a str>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        if input.is_empty() {
            return Err(ParseError::MissingData("no lines".into()));
        }
        Ok(input.lines().collect())
    }
}

impl PartSolver<1> for LineCounter {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

impl PartSolver<2> for LineCounter {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|line| line.len()).max().unwrap_or(0).to_string())
    }
}

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2031, day = 5)]
struct Untagged;

impl AocParser for Untagged {
    type SharedData<'a> = ();

    fn parse(_input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(())
    }
}

impl PartSolver<1> for Untagged {
    fn solve(_shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok("ok".to_string())
    }
}

#[test]
fn test_plugin_is_collected() {
    let registry = SolverRegistryBuilder::new()
        .register_all_plugins()
        .unwrap()
        .build();

    let info = registry.get_info(2031, 4).expect("plugin should be registered");
    assert_eq!(info.parts, 2);

    let mut solver = registry.create_solver(2031, 4, "ab\nabcd\nc").unwrap();
    assert_eq!(solver.solve(1).unwrap().answer, "3");
    assert_eq!(solver.solve(2).unwrap().answer, "4");
}

#[test]
fn test_tag_filter_selects_plugins() {
    let registry = SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"macro-test"))
        .unwrap()
        .build();

    assert!(registry.contains(2031, 4));
    assert!(!registry.contains(2031, 5));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_parse_error_surfaces_through_registry() {
    let registry = SolverRegistryBuilder::new()
        .register_all_plugins()
        .unwrap()
        .build();

    assert!(registry.create_solver(2031, 4, "").is_err());
}
