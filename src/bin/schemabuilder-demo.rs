use schemabuilder::prelude::*;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> AppResult<()> {
    let seed = vec![
        Field::new("name", FieldType::String),
        Field::new("age", FieldType::Number),
        Field::nested(
            "address",
            vec![
                Field::new("street", FieldType::String),
                Field::new("city", FieldType::String),
            ],
        ),
    ];

    let result = SchemaBuilderUI::new(seed)
        .with_title("Schema Builder Demo")
        .run()?;

    println!("{}", serde_json::to_string_pretty(&result.document)?);
    Ok(())
}
