use alloc::string::String;

use super::Annotated;
use crate::{
    chain,
    kv::{DataValue, KvPairs, Value, is_reserved_key},
};

impl Annotated {
    /// Stores `value` under `key` on this node.
    ///
    /// Fails without changing anything if `key` is reserved (starts with
    /// `'_'`). An existing value for `key` is replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut err = errnote::new("lookup failed");
    /// err.set_key_val("user", "alice").unwrap();
    /// assert!(err.set_key_val("_internal", 1).is_err());
    ///
    /// assert_eq!(
    ///     err.get_value("user").and_then(|v| v.downcast_ref::<&str>()),
    ///     Some(&"alice")
    /// );
    /// ```
    pub fn set_key_val<V: DataValue>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<(), Annotated> {
        let key = key.into();
        if is_reserved_key(&key) {
            return Err(crate::new("cannot use a reserved key (string starting with '_')"));
        }
        self.data
            .get_or_insert_with(KvPairs::new)
            .insert(key, Value::new(value));
        Ok(())
    }

    /// Merges `pairs` into the data of this node; `pairs` wins on
    /// collisions. Reserved keys are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use errnote::kv;
    ///
    /// let mut err = errnote::new("x");
    /// err.set_data(kv! { "a" => 1, "b" => 1 });
    /// err.set_data(kv! { "b" => 2, "c" => 2, "_skipped" => 2 });
    /// assert_eq!(err.get_all_data().to_string(), "{a:1, b:2, c:2}");
    /// ```
    pub fn set_data(&mut self, pairs: KvPairs) {
        self.data
            .get_or_insert_with(KvPairs::new)
            .overlay_public(&pairs);
    }

    /// Finds the first value stored under `key` in this node or anything it
    /// wraps, searching depth-first. Reserved keys are never found.
    ///
    /// See [`chain::get_value`].
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        chain::get_value(self, key)
    }

    /// Merges the data of this node and everything it wraps.
    ///
    /// Shallower nodes win over deeper ones; among the members of a
    /// [`Joined`](crate::Joined), later members win. See
    /// [`chain::get_all_data`].
    pub fn get_all_data(&self) -> KvPairs {
        chain::get_all_data(self)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{join, new, with_data, wrap, wrap_with_data};

    fn value_i32(err: &Annotated, key: &str) -> Option<i32> {
        err.get_value(key).and_then(|v| v.downcast_ref::<i32>()).copied()
    }

    #[test]
    fn test_reserved_key_rejected_without_mutation() {
        let mut err = new("x");
        let rejection = err.set_key_val("_msg", 1).unwrap_err();
        assert_eq!(
            rejection.to_string(),
            "cannot use a reserved key (string starting with '_')"
        );
        assert!(err.data().is_none());
    }

    #[test]
    fn test_set_data_twice() {
        let mut err = new("x");
        err.set_data(kv! { "first" => 1, "both" => 1 });
        err.set_data(kv! { "second" => 2, "both" => 2 });
        assert_eq!(value_i32(&err, "first"), Some(1));
        assert_eq!(value_i32(&err, "second"), Some(2));
        assert_eq!(value_i32(&err, "both"), Some(2));
    }

    #[test]
    fn test_shallowest_wins() {
        let c = with_data(new("c"), kv! { "k" => 3, "deep" => 3 });
        let b = wrap_with_data(c, "b", kv! { "k" => 2 });
        let a = with_data(b, kv! { "k" => 1 });

        assert_eq!(value_i32(&a, "k"), Some(1));
        assert_eq!(value_i32(&a, "deep"), Some(3));

        let all = a.get_all_data();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("k").and_then(|v| v.downcast_ref::<i32>()), Some(&1));
    }

    #[test]
    fn test_join_precedence() {
        let x = with_data(new("x"), kv! { "k" => "x" });
        let y = with_data(new("y"), kv! { "k" => "y" });
        let err = wrap(join([x, y]).expect("non-empty"), "msg");
        assert_eq!(err.get_all_data().to_string(), "{k:y}");
        // Lookup is depth-first in join order, so the first member answers.
        assert_eq!(err.get_value("k").map(ToString::to_string).as_deref(), Some("x"));

        let x = with_data(new("x"), kv! { "k" => "x" });
        let y = with_data(new("y"), kv! { "k" => "y" });
        let err = wrap_with_data(join([x, y]).expect("non-empty"), "msg", kv! { "k" => "w" });
        assert_eq!(err.get_all_data().to_string(), "{k:w}");
    }

    #[test]
    fn test_two_level_join_lookup() {
        let x = with_data(new("x"), kv! { "only_x" => 1 });
        let e2 = wrap(x, "m1");
        let e3 = crate::errorf!("m2").and_data(kv! { "only_e3" => 3 });
        let e4 = wrap(join([e2, e3]).expect("non-empty"), "m3");

        assert_eq!(value_i32(&e4, "only_x"), Some(1));
        assert_eq!(value_i32(&e4, "only_e3"), Some(3));
        assert_eq!(value_i32(&e4, "missing"), None);
    }
}
