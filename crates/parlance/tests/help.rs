use parlance::{
    BindError, BoundValues, CommandSpec, DispatchError, FieldSpec, HelpArgs, ParameterSchema,
    Parameters, Parser, ParserConfig,
};

struct DeployArgs {
    target: String,
    force: bool,
}

impl Parameters for DeployArgs {
    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .field(
                FieldSpec::value("target")
                    .required()
                    .description("Where to deploy"),
            )
            .field(FieldSpec::flag("force").description("Skip checks"))
    }

    fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
        Ok(Self {
            target: values.get("target")?,
            force: values.get("force")?,
        })
    }
}

fn parser() -> Parser {
    Parser::builder()
        .config(ParserConfig::default().with_exit(false))
        .command(
            CommandSpec::sync_with("DeployCommand", |args: DeployArgs| {
                let _ = (args.target, args.force);
            })
            .description("Deploys the build"),
        )
        .build()
}

#[test]
fn lists_commands_in_declaration_order() {
    let text = parser().help_text(&HelpArgs::default()).unwrap();
    assert_eq!(
        text,
        "deploy-command, dc | Deploys the build\n\
         help, h            | Prints this help text\n"
    );
}

#[test]
fn lists_arguments_of_one_command() {
    let args = HelpArgs {
        name: "dc".into(),
        expand: false,
    };
    let text = parser().help_text(&args).unwrap();
    assert_eq!(text, "- target : Where to deploy\n- force : Skip checks\n");
}

#[test]
fn help_command_binds_its_arguments() {
    let mut parser = parser();
    parser.parse("help").unwrap();
    parser.parse("h --expand").unwrap();
    parser.parse("help -n=deploy-command").unwrap();
}

#[test]
fn help_for_unknown_command_fails() {
    let mut parser = parser();
    let err = parser.parse("help --name=ghost").unwrap_err();
    let failure = &err.failures()[0];
    match &failure.error {
        DispatchError::InvocationFailed(inner) => {
            assert_eq!(inner.to_string(), "Command 'ghost' not found.");
        }
        other => panic!("unexpected {other:?}"),
    }
}
