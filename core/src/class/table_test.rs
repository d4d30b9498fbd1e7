#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::class::{ClassDef, ClassTable, Expr, MethodDef};
    use crate::error::EngineError;
    use crate::test_support::fruit_defs;
    use crate::val::Literal;

    fn fruit_table() -> Result<ClassTable> {
        let mut table = ClassTable::new();
        for def in fruit_defs() {
            table.define(def)?;
        }
        Ok(table)
    }

    #[test]
    fn test_define_and_lookup() -> Result<()> {
        let table = fruit_table()?;
        assert_eq!(table.len(), 3);

        let lemon = table.lookup("Lemon")?;
        let citrus = table.lookup("Citrus")?;
        assert_eq!(lemon.parent(), Some(citrus.id()));
        assert_eq!(lemon.depth(), 2);
        assert!(lemon.declared_methods().is_empty());
        assert_eq!(table.lookup("Fruit")?.parent(), None);
        Ok(())
    }

    #[test]
    fn test_unknown_class_lookup() -> Result<()> {
        let table = fruit_table()?;
        let err = table.lookup("Orange").unwrap_err();
        assert!(matches!(err, EngineError::UnknownClass { ref class } if &**class == "Orange"));
        assert!(!err.is_construction_error());
        Ok(())
    }

    #[test]
    fn test_ids_are_scoped_to_their_table() -> Result<()> {
        let table = fruit_table()?;
        let twin = fruit_table()?;
        let lemon = table.id_of("Lemon")?;
        let twin_lemon = twin.id_of("Lemon")?;

        assert_eq!(lemon.index(), twin_lemon.index());
        assert_ne!(lemon, twin_lemon);
        assert!(table.owns(lemon));
        assert!(!table.owns(twin_lemon));
        assert_eq!(table.get(lemon)?.name().as_ref(), "Lemon");
        let err = table.get(twin_lemon).unwrap_err();
        assert!(matches!(err, EngineError::UnknownClass { .. }));
        Ok(())
    }

    #[test]
    fn test_duplicate_class_rejected() -> Result<()> {
        let mut table = fruit_table()?;
        let err = table.define(ClassDef::new("Citrus")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateClass { ref class } if &**class == "Citrus"));
        assert!(err.is_construction_error());
        // the first definition is untouched
        assert_eq!(table.lookup("Citrus")?.declared_methods().len(), 1);
        Ok(())
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut table = ClassTable::new();
        let err = table.define(ClassDef::new("Lemon").extends("Citrus")).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownParent { ref class, ref parent } if &**class == "Lemon" && &**parent == "Citrus"
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_self_parent_is_cyclic() {
        let mut table = ClassTable::new();
        let err = table.define(ClassDef::new("Ouroboros").extends("Ouroboros")).unwrap_err();
        assert!(matches!(err, EngineError::CyclicHierarchy { ref class } if &**class == "Ouroboros"));
    }

    #[test]
    fn test_duplicate_members_rejected() {
        let mut table = ClassTable::new();
        let err = table
            .define(ClassDef::new("Twice").field("x", 1).field("x", 2))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMember { ref member, .. } if member == "x"));

        let err = table
            .define(
                ClassDef::new("Twice")
                    .method(MethodDef::expr("m", 0, Expr::lit(1)))
                    .method(MethodDef::expr("m", 0, Expr::lit(2))),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMember { ref member, .. } if member == "m/0"));

        // same name, different arity is a different signature
        let ok = table.define(
            ClassDef::new("Twice")
                .method(MethodDef::expr("m", 0, Expr::lit(1)))
                .method(MethodDef::expr("m", 1, Expr::arg(0))),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_ancestors_and_subclass_queries() -> Result<()> {
        let table = fruit_table()?;
        let fruit = table.id_of("Fruit")?;
        let citrus = table.id_of("Citrus")?;
        let lemon = table.id_of("Lemon")?;

        let names: Vec<&str> = table.ancestors(lemon).map(|c| &**c.name()).collect();
        assert_eq!(names, vec!["Lemon", "Citrus", "Fruit"]);

        assert!(table.is_subclass_of(lemon, fruit));
        assert!(table.is_subclass_of(lemon, lemon));
        assert!(table.is_subclass_of(citrus, fruit));
        assert!(!table.is_subclass_of(fruit, lemon));
        assert!(!table.is_subclass_of(citrus, lemon));
        Ok(())
    }

    #[test]
    fn test_unrelated_roots_are_not_subclasses() -> Result<()> {
        let mut table = ClassTable::new();
        let a = table.define(ClassDef::new("A"))?;
        let b = table.define(ClassDef::new("B"))?;
        assert!(!table.is_subclass_of(a, b));
        assert!(!table.is_subclass_of(b, a));
        Ok(())
    }

    #[test]
    fn test_field_layout_shadowing() -> Result<()> {
        let mut table = ClassTable::new();
        let base = table.define(ClassDef::new("Base").field("name", "base").field("size", 1))?;
        let derived = table.define(ClassDef::new("Derived").extends("Base").field("name", "derived"))?;

        let base = table.class_by_id(base);
        let derived = table.class_by_id(derived);

        // ancestor layout is a prefix of the descendant layout
        assert_eq!(derived.slots().len(), 3);
        assert_eq!(&derived.slots()[..2], base.slots());
        assert_eq!(derived.slots()[2].default, Literal::from("derived"));
        assert_eq!(derived.slots()[2].declared_by, derived.id());

        assert_eq!(base.field_slot("name"), Some(0));
        assert_eq!(derived.field_slot("name"), Some(2));
        assert_eq!(derived.field_slot("size"), Some(1));
        assert_eq!(derived.field_slot("missing"), None);
        Ok(())
    }
}
