//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口。
//! 上层通过 `KeyValueStore` 访问，便于测试时替换为内存实现。

/// 键值存储抽象
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 本地存储操作封装
///
/// 访问浏览器 LocalStorage API。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，成功返回 `true`
    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// 内存版存储，克隆后共享同一份数据
    #[derive(Clone, Default)]
    pub struct MemoryStorage {
        items: Rc<RefCell<HashMap<String, String>>>,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_item(self, key: &str, value: &str) -> Self {
            self.items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn len(&self) -> usize {
            self.items.borrow().len()
        }
    }

    impl KeyValueStore for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> bool {
            self.items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            true
        }

        fn delete(&self, key: &str) -> bool {
            self.items.borrow_mut().remove(key).is_some()
        }
    }

    #[test]
    fn test_memory_storage_shares_state_between_clones() {
        let store = MemoryStorage::new();
        let other = store.clone();

        assert!(store.set("token", "abc"));
        assert_eq!(other.get("token").as_deref(), Some("abc"));

        assert!(other.delete("token"));
        assert_eq!(store.get("token"), None);
        assert!(!store.delete("token"));
    }
}
