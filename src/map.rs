//! An ordered map backed by a left-leaning red-black tree.
//!
//! The tree is the one described in Sedgewick's left-leaning red-black tree
//! papers: red links lean left, 4-nodes are split on the way up, and deletion
//! pushes red links down the search path so it never removes a node from a
//! 2-node. Every node also carries its subtree size (for `rank` and O(1)
//! `len`) and a caller-chosen [`Augment`] value, recomputed whenever a node's
//! children change. The geometric indices in this crate use the augmentation
//! to store subtree maxima for pruned searches.

use std::cmp::Ordering;

use crate::Error;

/// Per-node data maintained through every structural change.
///
/// `recompute` is called with a node's key, value, and children's
/// augmentation values each time the node's children (or its value) may have
/// changed: on the unwind path of inserts and deletes, and inside every
/// rotation. Implementations must depend only on those inputs, so that
/// recomputing bottom-up keeps the whole tree consistent.
pub trait Augment<K, V>: Sized {
    /// Compute the augmentation value for a node. A leaf gets `None` for both
    /// children.
    fn recompute(key: &K, value: &V, left: Option<&Self>, right: Option<&Self>) -> Self;
}

/// The trivial augmentation, for maps that only need ordering.
impl<K, V> Augment<K, V> for () {
    fn recompute(_key: &K, _value: &V, _left: Option<&()>, _right: Option<&()>) {}
}

/// The color of a node's link from its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

impl Color {
    fn flip(&mut self) {
        *self = match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        };
    }
}

type Link<K, V, A> = Option<Box<Node<K, V, A>>>;

#[derive(Clone, Debug)]
struct Node<K, V, A> {
    key: K,
    value: V,
    color: Color,
    size: usize,
    aug: A,
    left: Link<K, V, A>,
    right: Link<K, V, A>,
}

fn size<K, V, A>(link: &Link<K, V, A>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

// Null links are black.
fn is_red<K, V, A>(link: &Link<K, V, A>) -> bool {
    link.as_ref().is_some_and(|n| n.color == Color::Red)
}

impl<K, V, A: Augment<K, V>> Node<K, V, A> {
    fn new(key: K, value: V) -> Self {
        let aug = A::recompute(&key, &value, None, None);
        Node {
            key,
            value,
            color: Color::Red,
            size: 1,
            aug,
            left: None,
            right: None,
        }
    }

    /// Recompute size and augmentation from the children. Must be called
    /// after every change to this node's children or value.
    fn update(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
        self.aug = A::recompute(
            &self.key,
            &self.value,
            self.left.as_deref().map(|n| &n.aug),
            self.right.as_deref().map(|n| &n.aug),
        );
    }
}

fn rotate_left<K, V, A: Augment<K, V>>(mut h: Box<Node<K, V, A>>) -> Box<Node<K, V, A>> {
    assert!(is_red(&h.right), "rotate_left without a red right link");
    let mut x = h.right.take().unwrap();
    h.right = x.left.take();
    x.color = h.color;
    h.color = Color::Red;
    h.update();
    x.left = Some(h);
    x.update();
    x
}

fn rotate_right<K, V, A: Augment<K, V>>(mut h: Box<Node<K, V, A>>) -> Box<Node<K, V, A>> {
    assert!(is_red(&h.left), "rotate_right without a red left link");
    let mut x = h.left.take().unwrap();
    h.left = x.right.take();
    x.color = h.color;
    h.color = Color::Red;
    h.update();
    x.right = Some(h);
    x.update();
    x
}

// Splits (or, during deletion, merges) a 4-node. Colors change but the
// structure doesn't, so sizes and augmentations stay valid.
fn flip_colors<K, V, A>(h: &mut Node<K, V, A>) {
    h.color.flip();
    h.left
        .as_deref_mut()
        .expect("flip_colors without two children")
        .color
        .flip();
    h.right
        .as_deref_mut()
        .expect("flip_colors without two children")
        .color
        .flip();
}

/// The insert unwind step: lean left, balance a 4-node, split a 4-node.
fn fixup<K, V, A: Augment<K, V>>(mut h: Box<Node<K, V, A>>) -> Box<Node<K, V, A>> {
    if is_red(&h.right) && !is_red(&h.left) {
        h = rotate_left(h);
    }
    if is_red(&h.left) && h.left.as_ref().is_some_and(|l| is_red(&l.left)) {
        h = rotate_right(h);
    }
    if is_red(&h.left) && is_red(&h.right) {
        flip_colors(&mut h);
    }
    h.update();
    h
}

/// The delete unwind step: `fixup` plus a leading rotation in case deletion
/// left a red link leaning right.
fn balance<K, V, A: Augment<K, V>>(mut h: Box<Node<K, V, A>>) -> Box<Node<K, V, A>> {
    if is_red(&h.right) {
        h = rotate_left(h);
    }
    fixup(h)
}

/// Assuming `h` is red and both its children are 2-nodes, make `h.left` or
/// one of its children red.
fn move_red_left<K, V, A: Augment<K, V>>(mut h: Box<Node<K, V, A>>) -> Box<Node<K, V, A>> {
    flip_colors(&mut h);
    if h.right.as_ref().is_some_and(|r| is_red(&r.left)) {
        h.right = Some(rotate_right(h.right.take().unwrap()));
        h = rotate_left(h);
    }
    h
}

/// Assuming `h` is red and both its children are 2-nodes, make `h.right` or
/// one of its children red.
fn move_red_right<K, V, A: Augment<K, V>>(mut h: Box<Node<K, V, A>>) -> Box<Node<K, V, A>> {
    flip_colors(&mut h);
    if h.left.as_ref().is_some_and(|l| is_red(&l.left)) {
        h = rotate_right(h);
    }
    h
}

fn insert_into<K: Ord, V, A: Augment<K, V>>(
    link: Link<K, V, A>,
    key: K,
    value: V,
) -> Box<Node<K, V, A>> {
    let Some(mut h) = link else {
        return Box::new(Node::new(key, value));
    };
    match key.cmp(&h.key) {
        Ordering::Less => h.left = Some(insert_into(h.left.take(), key, value)),
        Ordering::Greater => h.right = Some(insert_into(h.right.take(), key, value)),
        // An existing key keeps its node; only the value is replaced.
        Ordering::Equal => h.value = value,
    }
    fixup(h)
}

/// Removes the minimum of the subtree, returning the new subtree root and
/// the removed entry. The caller must have reddened the root if both its
/// children were black.
fn remove_min_node<K: Ord, V, A: Augment<K, V>>(
    mut h: Box<Node<K, V, A>>,
) -> (Link<K, V, A>, (K, V)) {
    if h.left.is_none() {
        // A left-leaning node with no left child has no right child either.
        debug_assert!(h.right.is_none());
        let Node { key, value, .. } = *h;
        return (None, (key, value));
    }
    let left_left_red = h.left.as_ref().is_some_and(|l| is_red(&l.left));
    if !is_red(&h.left) && !left_left_red {
        h = move_red_left(h);
    }
    let (new_left, entry) = remove_min_node(h.left.take().unwrap());
    h.left = new_left;
    (Some(balance(h)), entry)
}

fn remove_max_node<K: Ord, V, A: Augment<K, V>>(
    mut h: Box<Node<K, V, A>>,
) -> (Link<K, V, A>, (K, V)) {
    if is_red(&h.left) {
        h = rotate_right(h);
    }
    if h.right.is_none() {
        debug_assert!(h.left.is_none());
        let Node { key, value, .. } = *h;
        return (None, (key, value));
    }
    let right_left_red = h.right.as_ref().is_some_and(|r| is_red(&r.left));
    if !is_red(&h.right) && !right_left_red {
        h = move_red_right(h);
    }
    let (new_right, entry) = remove_max_node(h.right.take().unwrap());
    h.right = new_right;
    (Some(balance(h)), entry)
}

/// Removes `key` from the subtree, returning the new subtree root and the
/// removed value. The key must be present; the caller checks first.
fn remove_node<K: Ord, V, A: Augment<K, V>>(
    mut h: Box<Node<K, V, A>>,
    key: &K,
) -> (Link<K, V, A>, V) {
    if *key < h.key {
        let left_left_red = h.left.as_ref().is_some_and(|l| is_red(&l.left));
        if !is_red(&h.left) && !left_left_red {
            h = move_red_left(h);
        }
        // The key is present and less than h.key, so the left subtree is nonempty.
        let (new_left, value) = remove_node(h.left.take().unwrap(), key);
        h.left = new_left;
        (Some(balance(h)), value)
    } else {
        if is_red(&h.left) {
            h = rotate_right(h);
        }
        if *key == h.key && h.right.is_none() {
            let Node { value, .. } = *h;
            return (None, value);
        }
        let right_left_red = h.right.as_ref().is_some_and(|r| is_red(&r.left));
        if !is_red(&h.right) && !right_left_red {
            h = move_red_right(h);
        }
        if *key == h.key {
            // Two children: replace this entry with the successor (the
            // minimum of the right subtree) and delete that instead.
            let (new_right, (succ_key, succ_value)) = remove_min_node(h.right.take().unwrap());
            h.right = new_right;
            h.key = succ_key;
            let value = std::mem::replace(&mut h.value, succ_value);
            (Some(balance(h)), value)
        } else {
            let (new_right, value) = remove_node(h.right.take().unwrap(), key);
            h.right = new_right;
            (Some(balance(h)), value)
        }
    }
}

/// An ordered key-value map with subtree augmentation.
///
/// All mutating and searching operations are `O(log n)`. Iteration and range
/// queries are lazy, use an explicit stack, and borrow the map, so the
/// borrow checker rules out mutation while a query is being consumed.
///
/// Inserting a key that is already present silently replaces its value.
#[derive(Clone)]
pub struct OrderedMap<K, V, A = ()> {
    root: Link<K, V, A>,
}

impl<K, V, A> Default for OrderedMap<K, V, A> {
    fn default() -> Self {
        OrderedMap { root: None }
    }
}

impl<K: std::fmt::Debug + Ord, V: std::fmt::Debug, A: Augment<K, V>> std::fmt::Debug
    for OrderedMap<K, V, A>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V, A: Augment<K, V>> OrderedMap<K, V, A> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Is the map empty?
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts an entry, replacing the value if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) {
        let mut root = insert_into(self.root.take(), key, value);
        root.color = Color::Black;
        self.root = Some(root);
        self.maybe_check();
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &K) -> Result<&V, Error> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match key.cmp(&n.key) {
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Greater => node = n.right.as_deref(),
                Ordering::Equal => return Ok(&n.value),
            }
        }
        Err(Error::NotFound)
    }

    /// Is `key` present?
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_ok()
    }

    /// Removes `key`, returning its value.
    ///
    /// Fails with [`Error::NotFound`] if the key is absent, leaving the map
    /// untouched.
    pub fn remove(&mut self, key: &K) -> Result<V, Error> {
        if !self.contains(key) {
            return Err(Error::NotFound);
        }
        // unwrap: contains() just succeeded, so there is a root.
        let mut root = self.root.take().unwrap();
        // Redden the root if it's a 2-node, so red links can be pushed down.
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (new_root, value) = remove_node(root, key);
        self.root = new_root;
        if let Some(root) = &mut self.root {
            root.color = Color::Black;
        }
        self.maybe_check();
        Ok(value)
    }

    /// Removes and returns the smallest entry, or `None` if the map is empty.
    pub fn remove_min(&mut self) -> Option<(K, V)> {
        let mut root = self.root.take()?;
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (new_root, entry) = remove_min_node(root);
        self.root = new_root;
        if let Some(root) = &mut self.root {
            root.color = Color::Black;
        }
        self.maybe_check();
        Some(entry)
    }

    /// Removes and returns the largest entry, or `None` if the map is empty.
    pub fn remove_max(&mut self) -> Option<(K, V)> {
        let mut root = self.root.take()?;
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (new_root, entry) = remove_max_node(root);
        self.root = new_root;
        if let Some(root) = &mut self.root {
            root.color = Color::Black;
        }
        self.maybe_check();
        Some(entry)
    }

    /// The smallest key. Fails with [`Error::EmptyCollection`] on an empty map.
    pub fn min(&self) -> Result<&K, Error> {
        let mut node = self.root.as_deref().ok_or(Error::EmptyCollection)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.key)
    }

    /// The largest key. Fails with [`Error::EmptyCollection`] on an empty map.
    pub fn max(&self) -> Result<&K, Error> {
        let mut node = self.root.as_deref().ok_or(Error::EmptyCollection)?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Ok(&node.key)
    }

    /// The largest stored key `<= key`, or [`Error::NotFound`] if every
    /// stored key is greater.
    pub fn floor(&self, key: &K) -> Result<&K, Error> {
        let mut best = None;
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match key.cmp(&n.key) {
                Ordering::Equal => return Ok(&n.key),
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Greater => {
                    best = Some(&n.key);
                    node = n.right.as_deref();
                }
            }
        }
        best.ok_or(Error::NotFound)
    }

    /// The smallest stored key `>= key`, or [`Error::NotFound`] if every
    /// stored key is smaller.
    pub fn ceiling(&self, key: &K) -> Result<&K, Error> {
        let mut best = None;
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match key.cmp(&n.key) {
                Ordering::Equal => return Ok(&n.key),
                Ordering::Greater => node = n.right.as_deref(),
                Ordering::Less => {
                    best = Some(&n.key);
                    node = n.left.as_deref();
                }
            }
        }
        best.ok_or(Error::NotFound)
    }

    /// The number of stored keys strictly less than `key`. Works whether or
    /// not `key` itself is stored.
    pub fn rank(&self, key: &K) -> usize {
        let mut below = 0;
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match key.cmp(&n.key) {
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Greater => {
                    below += 1 + size(&n.left);
                    node = n.right.as_deref();
                }
                Ordering::Equal => return below + size(&n.left),
            }
        }
        below
    }

    /// Ascending iteration over all entries.
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Descending iteration over all entries.
    pub fn iter_rev(&self) -> IterRev<'_, K, V, A> {
        let mut iter = IterRev { stack: Vec::new() };
        iter.push_right_spine(self.root.as_deref());
        iter
    }

    /// Ascending iteration over the entries with `lo <= key <= hi`.
    ///
    /// Empty when `lo > hi`. Subtrees entirely outside the bounds are never
    /// visited.
    pub fn range(&self, lo: K, hi: K) -> RangeIter<'_, K, V, A> {
        let mut iter = RangeIter {
            stack: Vec::new(),
            lo,
            hi,
        };
        iter.push_bounded_spine(self.root.as_deref());
        iter
    }

    /// A pruned pre-order walk, yielding every visited entry.
    ///
    /// The root is always visited; a child subtree is entered only when
    /// `descend` accepts its augmentation value. This is the search primitive
    /// behind the interval and rectangle indices: they prune on a subtree
    /// maximum and filter the visited entries with an overlap test.
    pub fn search_pruned<F: Fn(&A) -> bool>(&self, descend: F) -> Pruned<'_, K, V, A, F> {
        Pruned {
            stack: self.root.as_deref().into_iter().collect(),
            descend,
        }
    }

    #[cfg(feature = "slow-asserts")]
    fn maybe_check(&self) {
        self.check_invariants();
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn maybe_check(&self) {}

    /// Asserts the red-black and size invariants. Used in tests, and after
    /// every mutation when enabling slow-asserts.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub(crate) fn check_invariants(&self) {
        // Counts the black links on every root-to-null path, asserting that
        // they all agree.
        fn black_height<K: Ord, V, A>(link: &Link<K, V, A>) -> usize {
            let Some(n) = link.as_deref() else {
                return 0;
            };
            if let Some(left) = n.left.as_deref() {
                assert!(left.key < n.key, "BST order violated on a left link");
            }
            if let Some(right) = n.right.as_deref() {
                assert!(right.key > n.key, "BST order violated on a right link");
            }
            assert!(!is_red(&n.right), "red link leaning right");
            if n.color == Color::Red {
                assert!(!is_red(&n.left), "red node with a red child");
            }
            assert_eq!(
                n.size,
                1 + size(&n.left) + size(&n.right),
                "stale subtree size"
            );
            let lh = black_height(&n.left);
            let rh = black_height(&n.right);
            assert_eq!(lh, rh, "black imbalance");
            lh + (n.color == Color::Black) as usize
        }

        assert!(!is_red(&self.root), "red root");
        black_height(&self.root);
    }
}

/// Ascending in-order iterator. See [`OrderedMap::iter`].
pub struct Iter<'a, K, V, A> {
    stack: Vec<&'a Node<K, V, A>>,
}

impl<'a, K, V, A> Iter<'a, K, V, A> {
    fn push_left_spine(&mut self, mut link: Option<&'a Node<K, V, A>>) {
        while let Some(n) = link {
            self.stack.push(n);
            link = n.left.as_deref();
        }
    }
}

impl<'a, K, V, A> Iterator for Iter<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        self.push_left_spine(n.right.as_deref());
        Some((&n.key, &n.value))
    }
}

/// Descending in-order iterator. See [`OrderedMap::iter_rev`].
pub struct IterRev<'a, K, V, A> {
    stack: Vec<&'a Node<K, V, A>>,
}

impl<'a, K, V, A> IterRev<'a, K, V, A> {
    fn push_right_spine(&mut self, mut link: Option<&'a Node<K, V, A>>) {
        while let Some(n) = link {
            self.stack.push(n);
            link = n.right.as_deref();
        }
    }
}

impl<'a, K, V, A> Iterator for IterRev<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        self.push_right_spine(n.left.as_deref());
        Some((&n.key, &n.value))
    }
}

/// Ascending iterator over a key range. See [`OrderedMap::range`].
pub struct RangeIter<'a, K, V, A> {
    stack: Vec<&'a Node<K, V, A>>,
    lo: K,
    hi: K,
}

impl<'a, K: Ord, V, A> RangeIter<'a, K, V, A> {
    // Like `push_left_spine`, but skips subtrees whose keys are all below `lo`.
    fn push_bounded_spine(&mut self, mut link: Option<&'a Node<K, V, A>>) {
        while let Some(n) = link {
            if n.key >= self.lo {
                self.stack.push(n);
                link = n.left.as_deref();
            } else {
                link = n.right.as_deref();
            }
        }
    }
}

impl<'a, K: Ord, V, A> Iterator for RangeIter<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        if n.key > self.hi {
            // The stack is ascending, so everything left on it is above `hi` too.
            self.stack.clear();
            return None;
        }
        self.push_bounded_spine(n.right.as_deref());
        Some((&n.key, &n.value))
    }
}

/// Pruned pre-order walk. See [`OrderedMap::search_pruned`].
pub struct Pruned<'a, K, V, A, F> {
    stack: Vec<&'a Node<K, V, A>>,
    descend: F,
}

impl<'a, K, V, A, F: Fn(&A) -> bool> Iterator for Pruned<'a, K, V, A, F> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        if let Some(left) = n.left.as_deref() {
            if (self.descend)(&left.aug) {
                self.stack.push(left);
            }
        }
        if let Some(right) = n.right.as_deref() {
            if (self.descend)(&right.aug) {
                self.stack.push(right);
            }
        }
        Some((&n.key, &n.value))
    }
}
