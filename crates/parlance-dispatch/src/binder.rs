//! Parameter binders and their per-type cache.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parlance_input::InputRegistry;

use crate::{BindError, BoundValues, NoParameters, ParameterSchema, Parameters};

/// A bound parameter object with its concrete type erased.
pub type ErasedParams = Box<dyn Any + Send>;

type BuildFn = Arc<dyn Fn(&BoundValues) -> Result<ErasedParams, BindError> + Send + Sync>;

/// Identity of a command's parameter type.
#[derive(Clone, Copy)]
pub struct ParameterType {
    id: TypeId,
    name: &'static str,
    binder: fn() -> ParameterBinder,
}

impl ParameterType {
    pub fn of<P: Parameters>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
            binder: ParameterBinder::of::<P>,
        }
    }

    /// The [`NoParameters`] sentinel.
    pub fn none() -> Self {
        Self::of::<NoParameters>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True for commands that take no arguments.
    pub fn is_none(&self) -> bool {
        self.id == TypeId::of::<NoParameters>()
    }

    pub(crate) fn make_binder(&self) -> ParameterBinder {
        (self.binder)()
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParameterType").field(&self.name).finish()
    }
}

impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParameterType {}

/// Binds registry contents into one parameter type.
///
/// The schema is computed once when the binder is created.
pub struct ParameterBinder {
    ty: TypeId,
    type_name: &'static str,
    schema: ParameterSchema,
    build: BuildFn,
}

impl ParameterBinder {
    pub fn of<P: Parameters>() -> Self {
        Self {
            ty: TypeId::of::<P>(),
            type_name: std::any::type_name::<P>(),
            schema: P::schema(),
            build: Arc::new(|values: &BoundValues| {
                P::from_bound(values).map(|p| Box::new(p) as ErasedParams)
            }),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.ty
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Resolves every declared field against the registry.
    ///
    /// Each field is looked up as `--name`, then `-short`. Supplied values
    /// win; otherwise a declared default is used; a missing required field
    /// is an error.
    pub fn resolve(&self, registry: &InputRegistry) -> Result<BoundValues, BindError> {
        let mut values = BoundValues::new();

        for field in self.schema.fields() {
            let long = field.long_key();
            let short = field.short_key();
            let found = match &short {
                Some(short) => registry.lookup_by_names(&long, short),
                None => registry.raw(&long).map(|v| (long.as_str(), v)),
            };

            match found {
                Some((key, value)) => values.supply(field.name(), key, field.normalize(value)),
                None if field.is_required() => {
                    return Err(BindError::MissingRequired {
                        field: field.name().to_string(),
                        long: field.long_key(),
                        short: field.short_key(),
                    })
                }
                None => {
                    if let Some(default) = field.declared_default() {
                        values.default_to(field.name(), default.clone());
                    }
                }
            }
        }

        Ok(values)
    }

    /// Resolves and constructs the parameter object.
    pub fn bind(&self, registry: &InputRegistry) -> Result<ErasedParams, BindError> {
        let values = self.resolve(registry)?;
        (self.build)(&values)
    }

    /// Like [`bind`](Self::bind), returning the concrete type.
    pub fn bind_as<P: Parameters>(&self, registry: &InputRegistry) -> Result<P, BindError> {
        self.bind(registry)?
            .downcast::<P>()
            .map(|p| *p)
            .map_err(|_| BindError::TypeMismatch {
                expected: std::any::type_name::<P>(),
            })
    }
}

impl fmt::Debug for ParameterBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterBinder")
            .field("type_name", &self.type_name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// One [`ParameterBinder`] per parameter type, shared read-only once built.
#[derive(Debug, Clone, Default)]
pub struct BinderCache {
    binders: HashMap<TypeId, Arc<ParameterBinder>>,
}

impl BinderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the binder for `P` if it is not cached yet.
    pub fn register<P: Parameters>(&mut self) -> Arc<ParameterBinder> {
        self.ensure(&ParameterType::of::<P>())
    }

    pub(crate) fn ensure(&mut self, ty: &ParameterType) -> Arc<ParameterBinder> {
        self.binders
            .entry(ty.id())
            .or_insert_with(|| Arc::new(ty.make_binder()))
            .clone()
    }

    pub fn get(&self, ty: &ParameterType) -> Option<&Arc<ParameterBinder>> {
        self.binders.get(&ty.id())
    }

    pub fn contains(&self, ty: &ParameterType) -> bool {
        self.binders.contains_key(&ty.id())
    }

    pub fn len(&self) -> usize {
        self.binders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldSpec;

    #[derive(Debug, PartialEq)]
    struct Greet {
        name: String,
        times: u32,
        loud: bool,
    }

    impl Parameters for Greet {
        fn schema() -> ParameterSchema {
            ParameterSchema::new()
                .field(FieldSpec::value("name").required())
                .field(FieldSpec::value("times").default_value("1"))
                .field(FieldSpec::flag("loud"))
        }

        fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
            Ok(Self {
                name: values.get("name")?,
                times: values.get("times")?,
                loud: values.get("loud")?,
            })
        }
    }

    fn registry(line: &str) -> InputRegistry {
        let mut registry = InputRegistry::new();
        registry.ingest_str(line);
        registry
    }

    #[test]
    fn test_bind_with_defaults() {
        let binder = ParameterBinder::of::<Greet>();
        let greet: Greet = binder.bind_as(&registry("--name=Ada")).unwrap();
        assert_eq!(
            greet,
            Greet {
                name: "Ada".into(),
                times: 1,
                loud: false,
            }
        );
    }

    #[test]
    fn test_bind_short_names() {
        let binder = ParameterBinder::of::<Greet>();
        let greet: Greet = binder.bind_as(&registry("-n=Ada -t=3 -l")).unwrap();
        assert_eq!(greet.times, 3);
        assert!(greet.loud);
    }

    #[test]
    fn test_flag_with_non_boolean_text_is_true() {
        let binder = ParameterBinder::of::<Greet>();
        let greet: Greet = binder.bind_as(&registry("--name=Ada --loud=yes")).unwrap();
        assert!(greet.loud);
    }

    #[test]
    fn test_missing_required() {
        let binder = ParameterBinder::of::<Greet>();
        let err = binder.bind(&registry("-t=2")).unwrap_err();
        match err {
            BindError::MissingRequired { field, long, short } => {
                assert_eq!(field, "name");
                assert_eq!(long, "--name");
                assert_eq!(short.as_deref(), Some("-n"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_wrong_concrete_type() {
        let binder = ParameterBinder::of::<Greet>();
        let err = binder
            .bind_as::<NoParameters>(&registry("--name=x"))
            .unwrap_err();
        assert!(matches!(err, BindError::TypeMismatch { .. }));
    }

    #[test]
    fn test_cache_builds_once_per_type() {
        let mut cache = BinderCache::new();
        let first = cache.register::<Greet>();
        let second = cache.register::<Greet>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&ParameterType::of::<Greet>()));
        assert!(!cache.contains(&ParameterType::none()));
    }

    #[test]
    fn test_sentinel_type() {
        assert!(ParameterType::none().is_none());
        assert!(!ParameterType::of::<Greet>().is_none());
    }
}
