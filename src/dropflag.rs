//! This module is for testing only

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

pub type DropFlag<T> = Rc<RefCell<T>>;

pub struct Droppable {
    pub dropflag: DropFlag<bool>,
}

impl Drop for Droppable {
    fn drop(&mut self) {
        *self.dropflag.borrow_mut() = true;
    }
}

/// Value that counts its drops into a shared counter.
///
/// Compares by `key` only, so `tag` can tell equal keys apart in stability tests.
#[derive(Debug)]
pub struct Counted {
    pub key: i32,
    pub tag: usize,
    pub drops: DropFlag<usize>,
}

impl Counted {
    pub fn new(key: i32, drops: &DropFlag<usize>) -> Counted {
        Counted { key, tag: 0, drops: drops.clone() }
    }

    pub fn tagged(key: i32, tag: usize, drops: &DropFlag<usize>) -> Counted {
        Counted { key, tag, drops: drops.clone() }
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        Counted { key: self.key, tag: self.tag, drops: self.drops.clone() }
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        *self.drops.borrow_mut() += 1;
    }
}

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd for Counted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

pub fn counter() -> DropFlag<usize> {
    DropFlag::new(RefCell::new(0))
}

#[test]
fn dropflag() {
    let flag = DropFlag::new(RefCell::new(false));
    let droppable = Droppable { dropflag: flag.clone() };
    assert_eq!(false, *flag.borrow());
    std::mem::drop(droppable);
    assert_eq!(true, *flag.borrow());
}

#[test]
fn counted_drops() {
    let drops = counter();
    let a = Counted::new(1, &drops);
    let b = a.clone();
    drop(a);
    drop(b);
    assert_eq!(2, *drops.borrow());
}
