mod mlp;
mod res_block;
mod res_layer;
mod resnet;
