//! 帖子评论树
//!
//! 评论树用 arena + 父→子索引表示，避免递归所有权结构。
//! 裁剪（每层按得分取前 K 个）是 arena 上的纯函数。

/// arena 中的节点下标
pub type NodeId = usize;

/// 帖子根节点固定为 0
pub const ROOT: NodeId = 0;

/// 评论树节点（帖子本身或一条评论）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadNode {
    /// 创建时间（unix 秒）
    pub created_utc: i64,
    /// 标题，仅帖子有
    pub title: Option<String>,
    /// 相对链接
    pub permalink: String,
    pub score: i64,
    pub content: String,
}

/// 评论树 arena
#[derive(Debug, Clone)]
pub struct ThreadArena {
    nodes: Vec<ThreadNode>,
    children: Vec<Vec<NodeId>>,
}

impl ThreadArena {
    /// 以帖子为根创建 arena
    pub fn new(post: ThreadNode) -> Self {
        Self {
            nodes: vec![post],
            children: vec![Vec::new()],
        }
    }

    /// 在 `parent` 下追加一个子节点，返回新节点下标
    ///
    /// `parent` 必须是已存在的节点
    pub fn push_child(&mut self, parent: NodeId, node: ThreadNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.children[parent].push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &ThreadNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id]
    }

    pub fn post(&self) -> &ThreadNode {
        &self.nodes[ROOT]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 按层裁剪后的渲染顺序
    ///
    /// `limits[d]` 是第 d+1 层保留的子节点数；超出 `limits` 长度的层全部丢弃。
    /// 同分节点保持原有顺序。返回 (节点, 深度)，根节点深度为 0。
    pub fn top_k_view(&self, limits: &[usize]) -> Vec<(NodeId, usize)> {
        let mut view = Vec::new();
        // 显式栈做先序遍历，子节点逆序压栈以保持输出顺序
        let mut stack = vec![(ROOT, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            view.push((id, depth));

            let Some(&limit) = limits.get(depth) else {
                continue;
            };

            let top = self.top_children(id, limit);
            for &child in top.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        view
    }

    /// 某节点得分最高的 `k` 个子节点
    fn top_children(&self, id: NodeId, k: usize) -> Vec<NodeId> {
        let mut ranked = self.children[id].clone();
        // sort_by 是稳定排序
        ranked.sort_by(|a, b| self.nodes[*b].score.cmp(&self.nodes[*a].score));
        ranked.truncate(k);
        ranked
    }
}
