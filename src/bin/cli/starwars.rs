//! Demo schema: the Star Wars characters.

use typegraph::{
    Enum, Field, Interface, Object, Resolver, Result, Scalar, Schema, SchemaBuilder, Signature,
    TypeRef, Value,
};

struct Character {
    id: &'static str,
    name: &'static str,
    friends: &'static [&'static str],
    appears_in: &'static [&'static str],
    home_planet: Option<&'static str>,
    primary_function: Option<&'static str>,
}

const CHARACTERS: &[Character] = &[
    Character {
        id: "1000",
        name: "Luke Skywalker",
        friends: &["1002", "1003", "2000", "2001"],
        appears_in: &["NEWHOPE", "EMPIRE", "JEDI"],
        home_planet: Some("Tatooine"),
        primary_function: None,
    },
    Character {
        id: "1001",
        name: "Darth Vader",
        friends: &["1004"],
        appears_in: &["NEWHOPE", "EMPIRE", "JEDI"],
        home_planet: Some("Tatooine"),
        primary_function: None,
    },
    Character {
        id: "1002",
        name: "Han Solo",
        friends: &["1000", "1003", "2001"],
        appears_in: &["NEWHOPE", "EMPIRE", "JEDI"],
        home_planet: None,
        primary_function: None,
    },
    Character {
        id: "1003",
        name: "Leia Organa",
        friends: &["1000", "1002", "2000", "2001"],
        appears_in: &["NEWHOPE", "EMPIRE", "JEDI"],
        home_planet: Some("Alderaan"),
        primary_function: None,
    },
    Character {
        id: "1004",
        name: "Wilhuff Tarkin",
        friends: &["1001"],
        appears_in: &["NEWHOPE"],
        home_planet: None,
        primary_function: None,
    },
    Character {
        id: "2000",
        name: "C-3PO",
        friends: &["1000", "1002", "1003", "2001"],
        appears_in: &["NEWHOPE", "EMPIRE", "JEDI"],
        home_planet: None,
        primary_function: Some("Protocol"),
    },
    Character {
        id: "2001",
        name: "R2-D2",
        friends: &["1000", "1002", "1003"],
        appears_in: &["NEWHOPE", "EMPIRE", "JEDI"],
        home_planet: None,
        primary_function: Some("Astromech"),
    },
];

fn is_droid(c: &Character) -> bool {
    c.primary_function.is_some()
}

struct Types {
    episode: Enum,
    human: Object,
    droid: Object,
}

impl Types {
    fn instance(&self, c: &Character) -> Value {
        let appears_in: Vec<Value> = c
            .appears_in
            .iter()
            .filter_map(|e| self.episode.member(e))
            .map(Value::Enum)
            .collect();
        let friends: Vec<&str> = c.friends.to_vec();

        if is_droid(c) {
            self.droid.instance([
                ("id", Value::from(c.id)),
                ("name", c.name.into()),
                ("friend_ids", friends.into()),
                ("appears_in", appears_in.into()),
                ("primary_function", c.primary_function.into()),
            ])
        } else {
            self.human.instance([
                ("id", Value::from(c.id)),
                ("name", c.name.into()),
                ("friend_ids", friends.into()),
                ("appears_in", appears_in.into()),
                ("home_planet", c.home_planet.into()),
            ])
        }
    }
}

fn find(id: &str) -> Option<&'static Character> {
    CHARACTERS.iter().find(|c| c.id == id)
}

/// Friends are stored by id on each instance and resolved lazily.
fn friends_resolver(types: &std::sync::Arc<Types>) -> Resolver {
    let types = types.clone();
    Resolver::sync(move |parent, _, _| {
        let ids = parent.field("friend_ids").and_then(Value::as_list).unwrap_or(&[]);
        Ok(Value::List(
            ids.iter()
                .filter_map(Value::as_str)
                .filter_map(find)
                .map(|c| types.instance(c))
                .collect(),
        ))
    })
}

pub fn build(builder: SchemaBuilder) -> Result<Schema> {
    let episode = Enum::builder("Episode")
        .description("One of the films in the Star Wars Trilogy")
        .member("NEWHOPE", "NEWHOPE")
        .member("EMPIRE", "EMPIRE")
        .member("JEDI", "JEDI")
        .build();

    let character = Interface::builder("Character")
        .description("A character in the Star Wars Trilogy")
        .field("id", TypeRef::non_null(Scalar::String))
        .field("name", Scalar::String)
        .field("appears_in", TypeRef::list(&episode))
        .build();
    character.define_field("friends", TypeRef::list(&character))?;

    let human = Object::builder("Human")
        .description("A humanoid creature in the Star Wars universe")
        .implements(&character)
        .field("id", TypeRef::non_null(Scalar::String))
        .field("name", Scalar::String)
        .field("appears_in", TypeRef::list(&episode))
        .field("home_planet", Scalar::String)
        .build();
    let droid = Object::builder("Droid")
        .description("A mechanical creature in the Star Wars universe")
        .implements(&character)
        .field("id", TypeRef::non_null(Scalar::String))
        .field("name", Scalar::String)
        .field("appears_in", TypeRef::list(&episode))
        .field("primary_function", Scalar::String)
        .build();

    let types = std::sync::Arc::new(Types {
        episode: episode.clone(),
        human: human.clone(),
        droid: droid.clone(),
    });
    human.define_field(
        "friends",
        Field::new(TypeRef::list(&character)).resolver(friends_resolver(&types)),
    )?;
    droid.define_field(
        "friends",
        Field::new(TypeRef::list(&character)).resolver(friends_resolver(&types)),
    )?;

    let query = Object::new("Query");

    let hero_types = types.clone();
    query.field(
        "hero",
        Signature::resolver()
            .arg_default("episode", &episode, Value::Null)
            .returns(&character)
            .description("Luke is the hero of Episode V, R2-D2 of the others"),
        Resolver::sync(move |_, _, args| {
            let empire = args
                .get_opt::<typegraph::EnumValue>("episode")?
                .is_some_and(|e| e.name() == "EMPIRE");
            let id = if empire { "1000" } else { "2001" };
            Ok(find(id).map(|c| hero_types.instance(c)).unwrap_or_default())
        }),
    )?;

    let human_types = types.clone();
    query.field(
        "human",
        Signature::resolver().arg("id", Scalar::String).returns(&human),
        Resolver::sync(move |_, _, args| {
            let id: String = args.get("id")?;
            Ok(find(&id)
                .filter(|c| !is_droid(c))
                .map(|c| human_types.instance(c))
                .unwrap_or_default())
        }),
    )?;

    let droid_types = types;
    query.field(
        "droid",
        Signature::resolver().arg("id", Scalar::String).returns(&droid),
        Resolver::sync(move |_, _, args| {
            let id: String = args.get("id")?;
            Ok(find(&id)
                .filter(|c| is_droid(c))
                .map(|c| droid_types.instance(c))
                .unwrap_or_default())
        }),
    )?;

    Ok(builder.query(&query).register(&human).register(&droid).build())
}
